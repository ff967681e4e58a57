use std::collections::HashSet;
use std::fs;

use fpdigest::digest::digest_file;
use fpdigest::eval::evaluate;
use fpdigest::labels::label_by_file_name;
use fpdigest::trainer::{train_dir, train_files};
use fpdigest::utils::suffix_regex;
use fpdigest::{DigestIndex, DuplicatePolicy, Error, Matcher};
use indicatif::ProgressBar;
use rstest::*;
use tempfile::TempDir;

mod common;

const SUBJECTS: [u32; 8] = [1, 5, 23, 64, 75, 177, 452, 600];

#[fixture]
fn dataset() -> TempDir {
    let dir = TempDir::new().unwrap();
    common::write_dataset(dir.path(), &SUBJECTS);
    dir
}

#[fixture]
fn trained(dataset: TempDir) -> (TempDir, DigestIndex) {
    let re = suffix_regex("bmp").unwrap();
    let index = train_dir(dataset.path(), &re, DuplicatePolicy::Last, &ProgressBar::hidden()).unwrap();
    (dataset, index)
}

#[rstest]
fn test_train_labels_by_prefix(trained: (TempDir, DigestIndex)) {
    let (_dir, index) = trained;
    assert_eq!(index.len(), SUBJECTS.len());
    assert!(index.digests().windows(2).all(|w| w[0] <= w[1]));
    let labels = index.labels().iter().map(String::as_str).collect::<HashSet<_>>();
    let expected = SUBJECTS.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    assert_eq!(labels, expected.iter().map(String::as_str).collect::<HashSet<_>>());
}

#[rstest]
fn test_train_is_deterministic(dataset: TempDir) {
    let mut files = fs::read_dir(dataset.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect::<Vec<_>>();
    files.sort();
    let a = train_files(&files, DuplicatePolicy::Last, &ProgressBar::hidden()).unwrap();
    let b = train_files(&files, DuplicatePolicy::Last, &ProgressBar::hidden()).unwrap();
    assert_eq!(a, b);
}

#[rstest]
fn test_digest_stable_across_reads(dataset: TempDir) {
    let path = dataset.path().join("64__M_Left_thumb_finger.bmp");
    let d1 = digest_file(&path).unwrap();
    let d2 = digest_file(&path).unwrap();
    assert_eq!(d1.to_bits(), d2.to_bits());
}

#[rstest]
fn test_model_round_trip(trained: (TempDir, DigestIndex)) {
    let (dir, index) = trained;
    let path = dir.path().join("model.cache.txt");
    index.save(&path).unwrap();
    let loaded = DigestIndex::load(&path).unwrap();
    assert_eq!(loaded.labels(), index.labels());
    for &d in index.digests() {
        assert_eq!(loaded.lookup(d).unwrap(), index.lookup(d).unwrap());
    }
}

#[rstest]
fn test_match_every_worker_count(trained: (TempDir, DigestIndex)) {
    let (dir, index) = trained;
    let re = suffix_regex("bmp").unwrap();
    let files = fpdigest::utils::scan_images(dir.path(), &re).unwrap();
    let output = TempDir::new().unwrap();
    let predictions = output.path().join("model.predictions.txt");

    for workers in 1..=num_cpus::get() {
        let matcher = Matcher::new(&index, workers);
        let items = label_by_file_name(files.clone());
        let count = matcher.run_to_file(items, &predictions, &ProgressBar::hidden()).unwrap();
        assert_eq!(count, SUBJECTS.len());

        let text = fs::read_to_string(&predictions).unwrap();
        let lines = text.lines().collect::<HashSet<_>>();
        assert_eq!(lines.len(), SUBJECTS.len(), "workers = {workers}");

        let report = evaluate(&predictions).unwrap();
        assert_eq!((report.pass, report.total), (SUBJECTS.len(), SUBJECTS.len()));
    }
}

#[rstest]
fn test_match_aborts_on_corrupt_image(trained: (TempDir, DigestIndex)) {
    let (dir, index) = trained;
    let broken = dir.path().join("9__F_Left_ring_finger.bmp");
    fs::write(&broken, b"garbage").unwrap();

    let re = suffix_regex("bmp").unwrap();
    let files = fpdigest::utils::scan_images(dir.path(), &re).unwrap();
    let output = TempDir::new().unwrap();
    let matcher = Matcher::new(&index, 2);
    let result = matcher.run_to_file(
        label_by_file_name(files),
        output.path().join("model.predictions.txt"),
        &ProgressBar::hidden(),
    );
    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[rstest]
fn test_train_empty_dir() {
    let dir = TempDir::new().unwrap();
    let re = suffix_regex("bmp").unwrap();
    let result = train_dir(dir.path(), &re, DuplicatePolicy::Last, &ProgressBar::hidden());
    assert!(matches!(result, Err(Error::EmptyDataset(_))));
}
