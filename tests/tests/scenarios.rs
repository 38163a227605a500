use anyhow::{Error, bail};
use resource_pack_common::{MANIFEST_PATH, category::Category, manifest::Manifest};
use resource_pack_packer::{
    classifier::Classifier,
    entry::Entry,
    pipeline::{Builder, Stage},
    processor::{Processor, from_fn},
    sink::Sink,
};
use resource_pack_tests::{
    ResourceTree, archive_content, archive_names, archive_read, logger_init, memory_file,
};
use std::sync::{Arc, Mutex};
use test_case::test_case;

fn builder(tree: &ResourceTree) -> Builder {
    logger_init();

    let mut builder = Builder::new();
    builder
        .manifest_set(Manifest::new("Scenario pack", 46))
        .output_path_set(tree.output_path());
    builder
}

// records paths it was called with, keeps everything
#[derive(Default)]
struct Recorder {
    paths: Mutex<Vec<String>>,
}
impl Recorder {
    fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}
impl Processor for Recorder {
    fn process(
        &self,
        entry: &dyn Entry,
        _sink: &Sink,
    ) -> Result<bool, Error> {
        self.paths
            .lock()
            .unwrap()
            .push(entry.path().full_path().to_owned());
        Ok(true)
    }
}

#[test]
fn unprocessed_entry_is_copied_with_manifest() {
    let tree = ResourceTree::new().unwrap();
    let content = [0x89, b'P', b'N', b'G', 0x00, 0xff, 0x10];

    let mut classifier = Classifier::empty();
    classifier.register(Category::Textures, ["textures"]).unwrap();

    let mut builder = builder(&tree);
    builder
        .classifier_set(classifier)
        .entry_add(memory_file("assets/modx/textures/foo.png", &content));
    let report = builder.build().unwrap().process().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.entries_copied, 1);

    let entries = archive_read(&tree.output_path()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0],
        (
            "assets/modx/textures/foo.png".to_owned(),
            content.to_vec()
        )
    );

    let (name, manifest) = &entries[1];
    assert_eq!(name, MANIFEST_PATH);
    let manifest: serde_json::Value = serde_json::from_slice(manifest).unwrap();
    assert_eq!(
        manifest,
        serde_json::json!({"pack": {"description": "Scenario pack", "pack_format": 46}})
    );
}

#[test]
fn processor_vote_drops_temporary_files() {
    let tree = ResourceTree::new().unwrap();

    let mut builder = builder(&tree);
    builder
        .processor_add(
            Category::Textures,
            from_fn("drop-tmp", |entry, _sink| {
                Ok(!entry.path().file_name().ends_with(".tmp"))
            }),
        )
        .entry_add(memory_file("assets/modx/textures/a.png", b"a"))
        .entry_add(memory_file("assets/modx/textures/b.tmp", b"b"));
    let report = builder.build().unwrap().process().unwrap();
    assert_eq!(report.entries_copied, 1);
    assert_eq!(report.entries_dropped, 1);

    assert_eq!(
        archive_names(&tree.output_path()).unwrap(),
        vec!["assets/modx/textures/a.png", MANIFEST_PATH]
    );
}

#[test_case(Category::Sounds, false; "sounds processor")]
#[test_case(Category::Textures, false; "unrelated processor")]
#[test_case(Category::Custom, true; "fallback processor")]
#[test_case(Category::All, true; "wildcard processor")]
fn namespace_root_file_is_custom(
    category: Category,
    expected_called: bool,
) {
    let tree = ResourceTree::new().unwrap();
    let recorder = Arc::new(Recorder::default());

    let mut classifier = Classifier::standard();
    classifier.register(Category::Sounds, ["sounds.json"]).unwrap();

    let mut builder = builder(&tree);
    builder
        .classifier_set(classifier)
        .processor_shared_add(category, recorder.clone())
        .entry_add(memory_file("assets/modx/sounds.json", b"{}"));
    builder.build().unwrap().process().unwrap();

    assert_eq!(!recorder.paths().is_empty(), expected_called);
}

#[test]
fn failing_processor_is_reported_and_entry_copied() {
    let tree = ResourceTree::new().unwrap();
    let after = Arc::new(Recorder::default());

    let mut builder = builder(&tree);
    builder
        .processor_add(
            Category::Models,
            from_fn("broken", |entry, _sink| {
                if entry.path().key() == "item/x" {
                    bail!("model x is broken");
                }
                Ok(true)
            }),
        )
        .processor_shared_add(Category::All, after.clone())
        .entry_add(memory_file("assets/modx/models/item/x.json", b"{\"x\":1}"))
        .entry_add(memory_file("assets/modx/models/item/y.json", b"{\"y\":1}"));
    let report = builder.build().unwrap().process().unwrap();

    assert_eq!(report.entries_copied, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, "assets/modx/models/item/x.json");
    assert_eq!(
        report.failures[0].stage,
        Stage::Process {
            processor: "broken".to_owned()
        }
    );

    // subsequent entry was processed
    assert_eq!(
        after.paths(),
        vec![
            "assets/modx/models/item/x.json",
            "assets/modx/models/item/y.json"
        ]
    );
    assert_eq!(
        archive_content(&tree.output_path(), "assets/modx/models/item/x.json").unwrap(),
        Some(b"{\"x\":1}".to_vec())
    );
}

#[test]
fn same_destination_keeps_first_entry_and_reports_second() {
    let tree = ResourceTree::new().unwrap();

    let mut builder = builder(&tree);
    builder
        .entry_add(memory_file("assets/modx/textures/a.png", b"first"))
        .entry_add(memory_file("assets/modx/textures/a.png", b"second"));
    let report = builder.build().unwrap().process().unwrap();

    assert_eq!(report.entries_copied, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, Stage::Copy);

    assert_eq!(
        archive_read(&tree.output_path()).unwrap(),
        vec![
            ("assets/modx/textures/a.png".to_owned(), b"first".to_vec()),
            (
                MANIFEST_PATH.to_owned(),
                Manifest::new("Scenario pack", 46)
                    .to_json_string()
                    .unwrap()
                    .into_bytes()
            ),
        ]
    );
}
