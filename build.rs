use std::collections::HashSet;
use std::path::Path;

const CORPUS_PATH: &str = "data/sample_corpus.json";

fn main() {
    validate_corpus_file(Path::new(CORPUS_PATH));
    set_build_dependencies();
}

fn validate_corpus_file(corpus_path: &Path) {
    // Ensure corpus exists at build time
    assert!(
        corpus_path.exists(),
        "\n\nCORPUS BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the sample corpus before building.\n",
        corpus_path.display()
    );

    let corpus_contents = std::fs::read_to_string(corpus_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCORPUS BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            corpus_path.display()
        );
    });

    let corpus: serde_json::Value = serde_json::from_str(&corpus_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCORPUS BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            corpus_path.display()
        );
    });

    validate_corpus_structure(&corpus);
}

fn validate_corpus_structure(corpus: &serde_json::Value) {
    assert!(
        corpus.is_object(),
        "\n\nCORPUS BUILD ERROR: Root must be a JSON object\n\
         Got: {corpus}\n"
    );

    let text_ids = collect_text_ids(corpus);

    let chapters = corpus
        .get("chapters")
        .and_then(serde_json::Value::as_array)
        .unwrap_or_else(|| {
            panic!(
                "\n\nCORPUS BUILD ERROR: Missing 'chapters' array\n\
                 The corpus must have a top-level 'chapters' array.\n"
            );
        });

    let mut seen = HashSet::new();
    for (i, chapter) in chapters.iter().enumerate() {
        let chapter_id = validate_chapter_fields(chapter, i);
        assert!(
            seen.insert(chapter_id.to_string()),
            "\n\nCORPUS BUILD ERROR: Duplicate chapter id '{chapter_id}'\n"
        );

        let text_id = chapter
            .get("text_id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        assert!(
            text_ids.contains(text_id),
            "\n\nCORPUS BUILD ERROR: Chapter '{chapter_id}' references unknown text '{text_id}'\n"
        );
    }

    println!(
        "cargo:warning=Validated sample corpus: {} texts, {} chapters",
        text_ids.len(),
        chapters.len()
    );
}

fn collect_text_ids(corpus: &serde_json::Value) -> HashSet<String> {
    corpus
        .get("texts")
        .and_then(serde_json::Value::as_array)
        .map(|texts| {
            texts
                .iter()
                .filter_map(|t| t.get("id").and_then(serde_json::Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn validate_chapter_fields(chapter: &serde_json::Value, index: usize) -> &str {
    let chapter_id = chapter
        .get("id")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_else(|| {
            panic!("\n\nCORPUS BUILD ERROR: Chapter at index {index} missing string 'id' field\n")
        });

    for field in ["text_id", "name", "signs"] {
        assert!(
            chapter.get(field).is_some_and(serde_json::Value::is_string),
            "\n\nCORPUS BUILD ERROR: Chapter '{chapter_id}' (index {index}) missing string '{field}' field\n"
        );
    }

    chapter_id
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the sample corpus changes
    println!("cargo:rerun-if-changed={CORPUS_PATH}");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
