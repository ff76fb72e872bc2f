//! Sales export ingestion.
//!
//! Discovers CSV files and workbooks below a lab-scoped raw folder and reads
//! them into [`RawTable`]s: a header row plus string cells, decoded as UTF-8
//! with a Latin-1 fallback. Every workbook sheet is its own table.

pub mod csv;
pub mod decode;
pub mod discovery;
pub mod error;
pub mod table;
pub mod workbook;

pub use crate::csv::{read_csv_frame, read_csv_headers, read_csv_table, read_text, write_csv_frame};
pub use decode::{TextEncoding, decode_text};
pub use discovery::{
    SourceFile, SourceKind, WORKBOOK_EXTENSIONS, discover_sources, lab_folder, lab_subfolder,
    list_csv_files, source_kind,
};
pub use error::{IngestError, Result};
pub use table::{RawTable, unnamed_header};
pub use workbook::{SheetReadOptions, SheetTable, read_workbook, read_workbook_with};
