use std::fs;

use salesprep_ingest::{SourceKind, discover_sources, list_csv_files, read_csv_table};

#[test]
fn discovers_sources_sorted_with_lab_folders() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    fs::create_dir_all(root.join("leca/2024")).expect("mkdir leca");
    fs::create_dir_all(root.join("aplus")).expect("mkdir aplus");
    fs::write(root.join("leca/2024/b.csv"), "a\n1\n").expect("write");
    fs::write(root.join("leca/a.CSV"), "a\n1\n").expect("write");
    fs::write(root.join("aplus/sales.xlsx"), b"").expect("write");
    fs::write(root.join("aplus/~$sales.xlsx"), b"").expect("write");
    fs::write(root.join("aplus/notes.txt"), "ignore").expect("write");
    fs::write(root.join("top.csv"), "a\n1\n").expect("write");

    let sources = discover_sources(root).expect("discover");
    let names: Vec<String> = sources
        .iter()
        .map(|s| {
            s.path
                .strip_prefix(root)
                .expect("relative")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    assert_eq!(
        names,
        vec!["aplus/sales.xlsx", "leca/2024/b.csv", "leca/a.CSV", "top.csv"]
    );
    assert_eq!(sources[0].kind, SourceKind::Workbook);
    assert_eq!(sources[0].lab_folder.as_deref(), Some("aplus"));
    assert_eq!(sources[1].lab_folder.as_deref(), Some("leca"));
    assert_eq!(sources[3].lab_folder, None);

    let csvs = list_csv_files(root).expect("csv files");
    assert_eq!(csvs.len(), 3);
}

#[test]
fn quoted_fields_survive_reading() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("quoted.csv");
    fs::write(&path, "Code,Description\n\"A1\",\"Crown, full \"\"PFM\"\"\"\n").expect("write");
    let table = read_csv_table(&path).expect("table");
    assert_eq!(table.rows[0][1], "Crown, full \"PFM\"");
}
