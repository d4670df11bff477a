//! Integration tests covering the keyed text provider.
use std::io::Cursor;

use metric_guard_core::{
    CheckInputError, CheckOptions, InputArray, InputKind, PreprocessorError, check_input,
};
use metric_guard_providers_text::{KeyedLoader, KeyedLoaderError};
use ndarray::array;
use rstest::{fixture, rstest};

const SOURCE: &str = "\
# image features
img0.png 0.89 0.11 1.48
img1.png 2.63 1.08 1.68

img2.png 1.00 0.59 0.62
";

#[fixture]
fn loader() -> KeyedLoader {
    KeyedLoader::try_from_reader("images", Cursor::new(SOURCE)).expect("source is well formed")
}

#[rstest]
fn reader_skips_comments_and_blank_lines(loader: KeyedLoader) {
    assert_eq!(loader.name(), "images");
    assert_eq!(loader.len(), 3);
    assert!(!loader.is_empty());
    assert_eq!(loader.dimension(), 3);
    assert_eq!(loader.keys(), ["img0.png", "img1.png", "img2.png"]);
    assert_eq!(loader.row("img2.png"), Some(&[1.00, 0.59, 0.62][..]));
    assert_eq!(loader.row("img3.png"), None);
}

#[rstest]
#[case::empty("", "keyed source holds no samples")]
#[case::only_comments("# nothing\n\n", "keyed source holds no samples")]
#[case::missing_values("a 1\nb\n", "line 2: key `b` has no values")]
#[case::invalid_number("a 1 x\n", "line 1: `x` is not a number")]
#[case::inconsistent("a 1 2\nb 1\n", "line 2: expected 2 value(s) but found 1")]
#[case::duplicate("a 1\na 2\n", "line 2: key `a` is already defined")]
fn reader_rejects_malformed_sources(#[case] raw: &str, #[case] message: &str) {
    let err = KeyedLoader::try_from_reader("demo", Cursor::new(raw)).expect_err("source is malformed");
    assert_eq!(err.to_string(), message);
}

#[rstest]
fn reader_propagates_io_error() {
    struct FailingReader;

    impl std::io::Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("boom"))
        }
    }

    impl std::io::BufRead for FailingReader {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            Err(std::io::Error::other("boom"))
        }

        fn consume(&mut self, _amt: usize) {}
    }

    let err = KeyedLoader::try_from_reader("demo", FailingReader).expect_err("I/O failure must propagate");
    assert!(matches!(err, KeyedLoaderError::Io(_)));
}

#[rstest]
fn load_keeps_the_indicator_shape(loader: KeyedLoader) {
    let loaded = loader
        .load(&InputArray::from(array![["img1.png", "img0.png"], ["img2.png", "img1.png"]]))
        .expect("keys are known");
    assert_eq!(loaded.shape(), &[2, 2, 3]);
}

#[rstest]
#[case::typo("img1.pgn", Some("img1.png"))]
#[case::far("thumbnail.jpeg", None)]
fn unknown_keys_suggest_the_closest_key(
    loader: KeyedLoader,
    #[case] key: &str,
    #[case] suggestion: Option<&str>,
) {
    let err = loader.load(&InputArray::from(vec![key])).expect_err("key is unknown");
    assert!(matches!(
        &err,
        KeyedLoaderError::UnknownKey { key: missing, suggestion: found }
            if missing == key && found.as_deref() == suggestion
    ));
    let hint = suggestion.map_or_else(String::new, |known| format!("; did you mean `{known}`?"));
    assert_eq!(err.to_string(), format!("unknown key `{key}`{hint}"));
}

#[rstest]
fn numeric_indicators_are_rejected(loader: KeyedLoader) {
    let err = loader.load(&InputArray::from(vec![1_i64])).expect_err("keys are strings");
    assert_eq!(err.to_string(), "indicator 1 is not a string key");
}

#[rstest]
fn preprocessor_expands_points_and_tuples(loader: KeyedLoader) {
    let preprocessor = loader.into_preprocessor();
    let points = check_input(
        &InputArray::from(vec!["img2.png", "img0.png"]),
        InputKind::Classic,
        Some(&preprocessor),
        &CheckOptions::new(),
    )
    .expect("keys are known");
    assert_eq!(
        points.into_array().into_f64(),
        array![[1.00, 0.59, 0.62], [0.89, 0.11, 1.48]].into_dyn()
    );

    let pairs = check_input(
        &InputArray::from(array![["img0.png", "img1.png"]]),
        InputKind::Tuples,
        Some(&preprocessor),
        &CheckOptions::new().with_tuple_size(2),
    )
    .expect("keys are known");
    assert_eq!(pairs.array().shape(), &[1, 2, 3]);
}

#[rstest]
fn preprocessor_failures_are_wrapped(loader: KeyedLoader) {
    let err = check_input(
        &InputArray::from(vec!["img9.png"]),
        InputKind::Classic,
        Some(&loader.into_preprocessor()),
        &CheckOptions::new(),
    )
    .expect_err("key is unknown");
    assert_eq!(
        err.to_string(),
        "An error occurred when trying to use the preprocessor: unknown key `img9.png`; did you mean `img0.png`?"
    );
    assert!(matches!(
        err,
        CheckInputError::Preprocessor(PreprocessorError::Callback(_))
    ));
}
