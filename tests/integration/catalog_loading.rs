//! Catalog scans over real directory trees.

use trmnld::catalog::{Catalog, CatalogError, DEFAULT_DURATION_SECS};
use trmnld::rotation;

use crate::common::fixtures::ImageTree;
use crate::common::init_test_logging;

fn paths(catalog: &Catalog) -> Vec<&str> {
    catalog.entries().iter().map(|e| e.path.as_str()).collect()
}

#[test]
fn nested_images_are_found_and_ordered() {
    init_test_logging();
    let tree = ImageTree::with_files(&[
        "z.png",
        "album/b.BMP",
        "album/a--60.png",
        "album/deeper/c.png",
        "readme.md",
        "album/cover.jpg",
    ]);

    let catalog = Catalog::load(tree.path()).unwrap();
    assert_eq!(
        paths(&catalog),
        vec!["album/a--60.png", "album/b.BMP", "album/deeper/c.png", "z.png"]
    );
    for (i, entry) in catalog.entries().iter().enumerate() {
        assert_eq!(entry.ordinal, i);
    }
    assert_eq!(catalog.entries()[0].duration_secs, 60);
    assert_eq!(catalog.entries()[1].duration_secs, DEFAULT_DURATION_SECS);
}

#[test]
fn ordering_is_bytewise() {
    init_test_logging();
    let tree = ImageTree::with_files(&["img2.png", "img10.png", "Img3.png"]);
    let catalog = Catalog::load(tree.path()).unwrap();
    assert_eq!(paths(&catalog), vec!["Img3.png", "img10.png", "img2.png"]);
}

#[test]
fn empty_directory_gives_empty_catalog() {
    init_test_logging();
    let tree = ImageTree::with_files(&["notes.txt", "sub/also.txt"]);
    let catalog = Catalog::load(tree.path()).unwrap();
    assert!(catalog.is_empty());
    assert!(catalog.first().is_none());
}

#[test]
fn missing_root_is_an_error() {
    init_test_logging();
    let tree = ImageTree::empty();
    let missing = tree.path().join("nope");
    assert!(matches!(
        Catalog::load(&missing),
        Err(CatalogError::DirectoryNotFound(_))
    ));
}

#[test]
fn file_root_is_an_error() {
    init_test_logging();
    let tree = ImageTree::empty();
    let file = tree.add("single.png");
    assert!(matches!(
        Catalog::load(&file),
        Err(CatalogError::NotADirectory(_))
    ));
}

#[test]
fn rotation_over_loaded_catalog_visits_every_image() {
    init_test_logging();
    let tree = ImageTree::with_files(&["a.png", "b.png", "c.png", "d--5.bmp"]);
    let catalog = Catalog::load(tree.path()).unwrap();

    let mut cursor = None;
    let mut seen = Vec::new();
    for _ in 0..catalog.len() {
        let next = rotation::next(cursor, &catalog).unwrap();
        seen.push(next.ordinal);
        cursor = Some(next.ordinal);
    }
    assert_eq!(seen, vec![0, 1, 2, 3]);
    assert_eq!(rotation::next(cursor, &catalog).unwrap().ordinal, 0);
}

#[cfg(unix)]
#[test]
fn symlinked_directories_are_not_followed() {
    init_test_logging();
    let outside = ImageTree::with_files(&["outside.png"]);
    let tree = ImageTree::with_files(&["inside.png"]);
    std::os::unix::fs::symlink(outside.path(), tree.path().join("linked")).unwrap();

    let catalog = Catalog::load(tree.path()).unwrap();
    assert_eq!(paths(&catalog), vec!["inside.png"]);
}
