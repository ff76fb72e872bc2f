//! Reference data about the group's own labs.

use serde::{Deserialize, Serialize};

/// Product descriptions containing this marker are always private work.
pub const RISIO_MARKER: &str = "RISIO";

/// A lab inside the group, keyed by its raw data folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalLab {
    pub key: String,
    pub name: String,
    pub postcode: String,
}

impl InternalLab {
    pub fn new(key: &str, name: &str, postcode: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            postcode: postcode.to_string(),
        }
    }
}

/// Postcode compared without spaces and case.
pub fn postcode_key(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Labs in the group with their registered postcodes.
pub fn builtin_internal_labs() -> Vec<InternalLab> {
    [
        ("aesthetic_world", "Aesthetic World", "BL1 4SS"),
        ("aplus", "A Plus", "DD2 3SP"),
        ("ashford", "Asford Orthodontics", "SR5 3JG"),
        ("bristol_cadcam", "Bristol CadCam", "BS2 0XW"),
        ("burke_ortho", "Burke Orthodonics", "V94 KR04"),
        ("cardiff_orthodontics", "Cardiff Orthodontics", "CF14 5GH"),
        ("casterbridge", "Casterbridge", "DT1 3WA"),
        ("cbc_dental", "CBC Dental", "BS35 3UT"),
        ("ceroplast", "Ceroplast", "WR2 5BW"),
        ("central_dental_laboratory", "Central Dental Laboratory", "MK42 7HU"),
        ("dent8", "Dent8", "FY4 2JW"),
        ("densign", "Densign", "TW7 5FR"),
        ("dental_excellence", "Dental Excellence", "SY1 3AF"),
        ("dental_technique", "Dental Technique", "PH1 3UQ"),
        ("european_dental_lab", "European Dental Lab", "EX17 3AW"),
        ("george_house", "George House", "EX13 5JJ"),
        ("halo", "Halo Dental", "B42 1DY"),
        ("innovate", "Innovate Dental", "OL9 6TJ"),
        ("iw_dental", "IW Dental", "TQ12 6TR"),
        ("ken_poland", "Ken Poland", "W1G 6HH"),
        ("leca", "Leca Dental", "G52 4RY"),
        ("lodge", "Lodge Dental", "R42 2YQ"),
        ("oakview", "Oakview Restorations", "HP14 4HW"),
        ("passion", "Passion Dental", "DY8 4AZ"),
        ("romak", "Romak", "SA2 7BB"),
        ("precedental", "Precedental", "DY8 1PQ"),
        ("veus", "Veus", "DA2 6NX"),
        ("waterside", "Waterside", "NE63 0YG"),
        ("woodford", "Woodford Dental Services", "TS10 5BD"),
    ]
    .into_iter()
    .map(|(key, name, postcode)| InternalLab::new(key, name, postcode))
    .collect()
}

/// Lower-case name fragments that identify a sale to one of the group's labs.
pub fn builtin_search_terms() -> Vec<String> {
    [
        "leca",
        "ashford",
        "casterbridge",
        "dental technique",
        "cardiff ortho",
        "woodford",
        "dental excellence",
        "passion",
        "ceramics",
        "denture centre",
        "veus",
        "precedental",
        "ken poland",
        "bristol crown",
        "bristol cadcam",
        "bristol cad-cam",
        "iw dental",
        "ip milling",
        "reiner",
        "halo",
        "burke ortho",
        "dent 8",
        "dent8",
        "densign",
        "aesthetic world",
        "aplus",
        "a plus",
        "oakview restorations",
        "oakview",
        "central dental",
        "central dental lab",
        "ceroplast",
        "european dental lab",
        "innovate",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
