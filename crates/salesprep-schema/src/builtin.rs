//! Layouts known to ship from the lab-management systems in use.

/// Labtrac full export keyed on `Date`.
pub const SCHEMA_1: &[&str] = &[
    "Order", "Patient", "Code", "Name", "Recieved", "Date", "Product Link", "Description",
    "Value", "Category", "Standard", "Status", "Qty", "Delivery 1", "Delivery 2", "Delivery 3",
    "Delivery 4", "Delivery 5", "Invoice 1", "Invoice 2", "Invoice 3", "Invoice 4", "Invoice 5",
];

/// Labtrac full export keyed on `CompletedDate`, with doctor analysis codes.
pub const SCHEMA_2: &[&str] = &[
    "Order", "Stage", "Patient", "Code", "Name", "Recieved", "Due Date", "CompletedDate",
    "Product Link", "Description", "Value", "Qty", "Category", "Standard", "Status",
    "Delivery 1", "Delivery 2", "Delivery 3", "Delivery 4", "Delivery 5", "Invoice 1",
    "Invoice 2", "Invoice 3", "Invoice 4", "Invoice 5", "DoctorAnalysis1", "DoctorAnalysis2",
    "DoctorAnalysis3", "DoctorAnalysis4", "DoctorAnalysis5",
];

/// Labtrac old export.
pub const SCHEMA_3: &[&str] = &[
    "Id", "Reference", "DoctorId", "DoctorName", "LicenceNo", "Address1", "Address2", "Address3",
    "Address4", "Address5", "DoctorAnalysis1", "DoctorAnalysis2", "DoctorAnalysis3",
    "DoctorAnalysis4", "DoctorAnalysis5", "DoctorAnalysis6", "DoctorAnalysis7",
    "DoctorAnalysis8", "DoctorAnalysis9", "DoctorAnalysis10", "DateCreated", "DateDue",
    "InvoiceDate", "DateShipped", "CategoryDescription", "StandardDescription", "ProductId",
    "ProductName", "ProductAnalysis1", "ProductAnalysis2", "ProductAnalysis3",
    "ProductAnalysis4", "ProductAnalysis5", "ProductAnalysis6", "ProductAnalysis7",
    "ProductAnalysis8", "ProductAnalysis9", "ProductAnalysis10", "MaterialId", "MaterialName",
    "MaterialAnalysis1", "MaterialAnalysis2", "MaterialAnalysis3", "MaterialAnalysis4",
    "MaterialAnalysis5", "MaterialAnalysis6", "MaterialAnalysis7", "MaterialAnalysis8",
    "MaterialAnalysis9", "MaterialAnalysis10", "Net", "Tax", "Gross", "Units", "Qty", "Status",
    "CurrencySymbol", "CurrencyDescription",
];

/// Columns the old export gains when saved with two trailing blank headers.
pub const SCHEMA_4_EXTRA: &[&str] = &["Unnamed: 58", "Unnamed: 59"];

/// Transactor customer/product cube.
pub const SCHEMA_5: &[&str] = &[
    "Year", "Month", "ShipID", "ShipFullName", "ShipAddress", "CustID", "CustFullName", "code",
    "Description", "PriceBand", "NetUnitPrice", "DiscountedUnitPrice", "Qty", "Net_Sales",
    "Tax_Sales",
];

/// Transactor cube without year and month.
pub const SCHEMA_6: &[&str] = &[
    "custID", "CustFullName", "shipid", "shipfullname", "code", "Description", "Qty",
    "Net_Sales", "Tax_Sales",
];

/// Leca custom report, invoice-item naming.
pub const SCHEMA_7: &[&str] = &[
    "Year", "Month", "Practice Post Code or Identifier", "Practice", "Invoice.AccountReference",
    "Invoice.AccountName", "InvoiceItem.ProductAccountReference", "Product",
    "NHS /Private/Independent/PPE", "InvoiceItem.Quantity", "InvoiceItem.AmountNet",
    "InvoiceItem.AmountVAT",
];

/// Leca custom report, friendly naming.
pub const SCHEMA_8: &[&str] = &[
    "Year", "Month", "Practice Post Code or Identifier", "Practice Name", "Customer Account",
    "Dentist", "Product Code", "Product Description", "NHS /Private/Independent/PPE", "Quantity",
    "Invoice Amount", "Invoice VAT",
];

/// Leca custom report saved with a blank header row.
pub const SCHEMA_9: &[&str] = &[
    "Unnamed: 0", "Unnamed: 1", "Unnamed: 2", "Unnamed: 3", "Unnamed: 4", "Unnamed: 5",
    "Unnamed: 6", "Unnamed: 7", "Unnamed: 8", "Unnamed: 9", "Unnamed: 10", "Unnamed: 11",
];

/// Transactor cube as exported for Passion Dental Design.
pub const SCHEMA_10: &[&str] = &[
    "Year", "Month", "shipid", "shipfullname", "custID", "CustFullName", "code", "Description",
    "Qty", "Net_Sales", "Tax_Sales",
];

/// Lab folders whose files are classified by location, not by header.
pub const DENSIGN_FOLDER: &str = "densign";
pub const ASHFORD_FOLDER: &str = "ashford";

/// Signature entries in registration order: layout number, columns, family.
pub fn signature_entries() -> Vec<(usize, Vec<&'static str>, &'static str)> {
    vec![
        (1, SCHEMA_1.to_vec(), "Labtrac (new export)"),
        (2, SCHEMA_2.to_vec(), "Labtrac (new export)"),
        (3, SCHEMA_3.to_vec(), "Labtrac (old export)"),
        (4, [SCHEMA_3, SCHEMA_4_EXTRA].concat(), "Labtrac (old export)"),
        (5, SCHEMA_5.to_vec(), "Transactor"),
        (6, SCHEMA_6.to_vec(), "Transactor (no year/month)"),
        (7, SCHEMA_7.to_vec(), "Leca custom report"),
        (8, SCHEMA_8.to_vec(), "Leca custom report"),
        (9, SCHEMA_9.to_vec(), "Leca custom report (unnamed header)"),
        (10, SCHEMA_10.to_vec(), "Transactor (Passion Dental Design)"),
    ]
}

/// Path entries in registration order: layout number, lab folder below the raw root, family.
pub fn path_entries() -> Vec<(usize, &'static str, &'static str)> {
    vec![
        (11, DENSIGN_FOLDER, "Evident monthly report"),
        (12, ASHFORD_FOLDER, "Labtrac yearly exports (Ashford)"),
    ]
}
