use rust_xlsxwriter::Workbook;
use survey_syntax::coding_oa;
use survey_syntax::loader::{LoadError, load_table};

fn responses_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in ["Vrid", "Comment", "R2", "R1"].iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    worksheet.write_number(1, 0, 1001.0).unwrap();
    worksheet.write_string(1, 1, "sweet and cheap").unwrap();
    worksheet.write_number(1, 2, 5.0).unwrap();
    worksheet.write_number(1, 3, 3.0).unwrap();
    // no identifier: skipped
    worksheet.write_number(2, 3, 9.0).unwrap();
    worksheet.write_number(3, 0, 1002.0).unwrap();
    worksheet.write_number(3, 3, 4.0).unwrap();

    workbook.save_to_buffer().unwrap()
}

#[test]
fn workbook_first_row_is_header() {
    let table = load_table("answers.xlsx", responses_workbook()).unwrap();

    assert_eq!(table.headers, vec!["Vrid", "Comment", "R2", "R1"]);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(table.rows[0][0], "1001");
    assert_eq!(table.rows[0][1], "sweet and cheap");
}

#[test]
fn workbook_drives_coding_syntax() {
    let table = load_table("answers.xlsx", responses_workbook()).unwrap();
    let codelist = "3\"Sweet\"\n4 'Cheap'\n5 Other taste\nfree text line\n";

    let syntax = coding_oa::generate(&table, codelist, "Q9");
    assert_eq!(
        syntax,
        "IF Vrid = 1001 Q9_code1 = 3.\n\
         IF Vrid = 1002 Q9_code1 = 4.\n\
         \n\
         IF Vrid = 1001 Q9_code2 = 5.\n\
         \n\
         val lab Q9_code1 to Q9_code2\n\
         \x20   3 \"Sweet\"\n\
         \x20   4 \"Cheap\"\n\
         \x20   5 \"Other taste\"\n\
         .\n"
    );
}

#[test]
fn csv_file_on_disk_loads_like_a_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("answers.csv");
    std::fs::write(&path, "Vrid,R1\n1001,\"3\"\n,7\n").unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let table = load_table(path.to_str().unwrap(), bytes).unwrap();
    let syntax = coding_oa::generate(&table, "3 Sweet", "Q9");

    assert_eq!(syntax, "IF Vrid = 1001 Q9_code1 = 3.\n\nval lab Q9_code1\n    3 \"Sweet\"\n.\n");
}

#[test]
fn corrupt_workbook_is_reported() {
    let result = load_table("answers.xlsx", b"not a zip archive".to_vec());
    assert!(matches!(result, Err(LoadError::Workbook(_))));
}
