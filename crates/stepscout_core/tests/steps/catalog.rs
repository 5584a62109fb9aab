use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use stepscout_core::matching::{match_candidates, match_candidates_with_keyword};
use stepscout_core::step_catalog::{extract_catalog_from_files, SourceFile};

use crate::CoreWorld;

#[given("a sample step file with markers on the first and fifth lines")]
async fn a_sample_mixed_file(world: &mut CoreWorld) {
    world.files.push(SourceFile {
        path: "more_steps.py".into(),
        text: "@Given('there is a step')\ndef impl(context):\n    pass\n\n@When(\"it is ready\")  "
            .into(),
    });
}

#[given("a sample step file with a marker split across two lines")]
async fn a_sample_split_file(world: &mut CoreWorld) {
    world.files.push(SourceFile {
        path: "split.py".into(),
        text: "@Given('the first half '\n       'and the rest')\ndef impl(context):".into(),
    });
}

// Generic Given: push any step-file content via DocString.
#[given(regex = r#"^a step file \"([^\"]+)\" with content:$"#)]
async fn a_step_file_with_content(world: &mut CoreWorld, path: String, step: &Step) {
    let text = step.docstring.clone().unwrap_or_default();
    let text = text.strip_prefix('\n').unwrap_or(&text).to_string();
    world.files.push(SourceFile { path, text });
}

#[given("the catalog is extracted")]
#[when("the catalog is extracted")]
async fn the_catalog_is_extracted(world: &mut CoreWorld) {
    world.catalog = Some(extract_catalog_from_files(&world.files));
}

#[when(regex = r#"^completions are requested for \"([^\"]*)\"$"#)]
async fn completions_requested(world: &mut CoreWorld, query: String) {
    let catalog = world.catalog.as_ref().expect("catalog extracted");
    world.candidates = match_candidates(catalog, &query);
}

#[when(regex = r#"^completions are requested for \"([^\"]*)\" with keyword \"([^\"]+)\"$"#)]
async fn completions_requested_with_keyword(
    world: &mut CoreWorld,
    query: String,
    keyword: String,
) {
    let catalog = world.catalog.as_ref().expect("catalog extracted");
    world.candidates = match_candidates_with_keyword(catalog, &query, &keyword);
}

#[then(regex = r"^the catalog contains (\d+) markers?$")]
async fn catalog_contains(world: &mut CoreWorld, n: usize) {
    let catalog = world.catalog.as_ref().expect("catalog extracted");
    assert_eq!(catalog.stats.total, n);
}

#[then(regex = r#"^there is a marker \"(.*)\" at line (\d+) of \"([^\"]+)\"$"#)]
async fn there_is_marker(world: &mut CoreWorld, raw: String, line: usize, file: String) {
    let catalog = world.catalog.as_ref().expect("catalog extracted");
    let found = catalog
        .markers
        .iter()
        .any(|m| m.raw == raw && m.line == line && m.file == file);
    assert!(found, "expected marker not found: {raw} at {file}:{line}");
}

#[then(regex = r#"^marker (\d+) comes from \"([^\"]+)\"$"#)]
async fn marker_comes_from(world: &mut CoreWorld, index: usize, file: String) {
    let catalog = world.catalog.as_ref().expect("catalog extracted");
    assert_eq!(catalog.markers[index].file, file);
}

#[then(regex = r"^there is exactly (\d+) candidates?$")]
async fn exactly_candidates(world: &mut CoreWorld, n: usize) {
    assert_eq!(
        world.candidates.len(),
        n,
        "candidates: {:?}",
        world.candidates
    );
}

#[then(regex = r#"^candidate (\d+) has label \"([^\"]+)\" and remainder \"([^\"]+)\"$"#)]
async fn candidate_has(world: &mut CoreWorld, index: usize, label: String, remainder: String) {
    let candidate = &world.candidates[index];
    assert_eq!(candidate.label, label);
    assert_eq!(candidate.remainder, remainder);
}
