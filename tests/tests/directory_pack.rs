use resource_pack_common::{MANIFEST_PATH, category::Category, manifest::Manifest};
use resource_pack_packer::{
    archive_name::ArchiveName,
    builtin::{ExcludeExtensions, MinifyJson},
    directory::{SearchOptions, search},
    entry::{Entry, FsEntry},
    pipeline::{Builder, Stage},
    sink::Options,
};
use resource_pack_tests::{ResourceTree, archive_content, archive_names, logger_init};
use zip::CompressionMethod;

fn tree_sample() -> ResourceTree {
    let tree = ResourceTree::new().unwrap();
    tree.file_add("README.md", b"# sample")
        .unwrap()
        .file_add("pack.mcmeta", b"{\"pack\":{}}")
        .unwrap()
        .file_add("assets/readme.txt", b"not a resource")
        .unwrap()
        .file_add("assets/modx/sounds.json", b"{\n  \"a\": {}\n}\n")
        .unwrap()
        .file_add("assets/modx/lang/en_us.json", b"{ \"item.modx.ruby\": \"Ruby\" }")
        .unwrap()
        .file_add("assets/modx/models/item/ruby.json", b"{ broken")
        .unwrap()
        .file_add("assets/modx/textures/item/ruby.png", &[0x89, b'P', 0x00, 0xff])
        .unwrap()
        .file_add("assets/modx/textures/item/ruby.png.mcmeta", b"{\"animation\": {}}")
        .unwrap()
        .file_add("assets/modx/textures/item/ruby.psd", b"layers")
        .unwrap()
        .directory_add("assets/modx/textures/empty")
        .unwrap();
    tree
}

#[test]
fn search_skips_non_resource_files() {
    let tree = tree_sample();

    let mut paths = search(tree.root(), &SearchOptions::default())
        .unwrap()
        .iter()
        .map(|entry| entry.path().full_path().to_owned())
        .collect::<Vec<_>>();
    paths.sort();

    assert_eq!(
        paths,
        vec![
            "assets/modx/lang/en_us.json",
            "assets/modx/models/item/ruby.json",
            "assets/modx/sounds.json",
            "assets/modx/textures/item/ruby.png",
            "assets/modx/textures/item/ruby.png.mcmeta",
            "assets/modx/textures/item/ruby.psd",
        ]
    );
}

#[test]
fn directory_is_packed_with_builtin_processors() {
    logger_init();
    let tree = tree_sample();

    let mut builder = Builder::new();
    builder
        .manifest_set(Manifest::new("Sample", 34))
        .output_path_set(tree.output_path())
        .processor_add(Category::All, MinifyJson)
        .entries_add(
            ExcludeExtensions::new(["psd", "mcmeta"])
                .filter(search(tree.root(), &SearchOptions::default()).unwrap()),
        )
        // directories may come from other sources, they are skipped
        .entry_add(
            FsEntry::build_from_path(&tree.root().join("assets/modx/textures/empty"), tree.root())
                .unwrap(),
        );
    let report = builder.build().unwrap().process().unwrap();

    assert_eq!(report.directories_skipped, 1);
    // png and broken model
    assert_eq!(report.entries_copied, 2);
    // minified sounds and lang
    assert_eq!(report.entries_dropped, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, "assets/modx/models/item/ruby.json");
    assert_eq!(
        report.failures[0].stage,
        Stage::Process {
            processor: "minify-json".to_owned()
        }
    );

    let output = tree.output_path();
    let mut names = archive_names(&output).unwrap();
    assert_eq!(names.pop().as_deref(), Some(MANIFEST_PATH));
    names.sort();
    assert_eq!(
        names,
        vec![
            "assets/modx/lang/en_us.json",
            "assets/modx/models/item/ruby.json",
            "assets/modx/sounds.json",
            "assets/modx/textures/item/ruby.png",
        ]
    );
    // excluded before minification
    assert_eq!(
        archive_content(&output, "assets/modx/textures/item/ruby.png.mcmeta").unwrap(),
        None
    );

    assert_eq!(
        archive_content(&output, "assets/modx/sounds.json").unwrap(),
        Some(b"{\"a\":{}}".to_vec())
    );
    assert_eq!(
        archive_content(&output, "assets/modx/lang/en_us.json").unwrap(),
        Some(b"{\"item.modx.ruby\":\"Ruby\"}".to_vec())
    );
    // failed to minify, copied verbatim
    assert_eq!(
        archive_content(&output, "assets/modx/models/item/ruby.json").unwrap(),
        Some(b"{ broken".to_vec())
    );
    assert_eq!(
        archive_content(&output, "assets/modx/textures/item/ruby.png").unwrap(),
        Some(vec![0x89, b'P', 0x00, 0xff])
    );
    assert_eq!(
        Manifest::from_json_slice(&archive_content(&output, MANIFEST_PATH).unwrap().unwrap())
            .unwrap(),
        Manifest::new("Sample", 34)
    );
}

#[test]
fn stored_archive_under_conventional_name() {
    logger_init();
    let tree = tree_sample();
    let output_directory = tree.output_path().with_file_name("resourcepacks");
    std::fs::create_dir_all(&output_directory).unwrap();
    let output = ArchiveName::new("sample", "1.0.0").path_in(&output_directory);

    let mut builder = Builder::new();
    builder
        .manifest_set(Manifest::new("Sample", 34))
        .output_path_set(output.clone())
        .sink_options_set(Options {
            compression_method: CompressionMethod::Stored,
            compression_level: None,
        })
        .entries_add(search(tree.root(), &SearchOptions::default()).unwrap());
    let report = builder.build().unwrap().process().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.entries_copied, 6);

    assert!(output.ends_with("sample-1.0.0-resource-pack.zip"));
    let file = std::fs::File::open(&output).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    for index in 0..archive.len() {
        assert_eq!(
            archive.by_index(index).unwrap().compression(),
            CompressionMethod::Stored
        );
    }
}

#[test]
fn rebuild_replaces_previous_archive() {
    let tree = tree_sample();

    for description in ["first", "second"] {
        let mut builder = Builder::new();
        builder
            .manifest_set(Manifest::new(description, 34))
            .output_path_set(tree.output_path())
            .entry_add(
                FsEntry::build_from_path(
                    &tree.root().join("assets/modx/textures/item/ruby.png"),
                    tree.root(),
                )
                .unwrap(),
            );
        builder.build().unwrap().process().unwrap();
    }

    let output = tree.output_path();
    assert_eq!(
        archive_names(&output).unwrap(),
        vec!["assets/modx/textures/item/ruby.png", MANIFEST_PATH]
    );
    assert_eq!(
        Manifest::from_json_slice(&archive_content(&output, MANIFEST_PATH).unwrap().unwrap())
            .unwrap(),
        Manifest::new("second", 34)
    );
}
