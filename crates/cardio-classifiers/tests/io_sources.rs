use std::io::Write;

use cardio_classifiers::error::PipelineError;
use cardio_classifiers::io::{CsvBytesSource, CsvFileSource, DatasetSource};
use cardio_classifiers::table::Column;

#[test]
fn file_source_reads_heart_disease_layout() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(
        file,
        "age,sex,chest_pain,fbs_over_120,Heart Disease\n\
         70,Laki-laki,4,Tidak,Presence\n\
         67,Perempuan,3,Ya,Absence\n\
         57,Laki-laki,NA,Tidak,Presence"
    )
    .unwrap();

    let table = CsvFileSource::new(file.path()).fetch().unwrap();
    assert_eq!(table.nrows(), 3);
    assert_eq!(table.ncols(), 5);
    assert_eq!(
        table.column("chest_pain"),
        Some(&Column::Numeric(vec![Some(4.0), Some(3.0), None]))
    );
    assert!(!table.column("fbs_over_120").unwrap().is_numeric());
}

#[test]
fn tsv_file_uses_tabs() {
    let mut file = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
    write!(file, "age\tbp\n50\t120\n").unwrap();
    let table = CsvFileSource::new(file.path()).fetch().unwrap();
    assert_eq!(table.column_names(), &["age".to_string(), "bp".to_string()]);
}

#[test]
fn missing_file_is_an_acquisition_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvFileSource::new(dir.path().join("nope.csv"));
    match source.fetch() {
        Err(PipelineError::Acquisition { source_name, .. }) => {
            assert!(source_name.contains("nope.csv"))
        }
        other => panic!("expected acquisition error, got {:?}", other),
    }
}

#[test]
fn upload_with_duplicate_header_fails() {
    let source = CsvBytesSource::new("dup.csv", b"age,age\n1,2\n".to_vec());
    assert!(matches!(
        source.fetch(),
        Err(PipelineError::Acquisition { .. })
    ));
}

#[test]
fn describe_names_the_origin() {
    let source = CsvBytesSource::new("heart.csv", Vec::new());
    assert_eq!(source.describe(), "upload heart.csv");
}
