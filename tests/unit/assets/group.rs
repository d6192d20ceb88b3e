use super::*;

fn names(groups: &AssetGroups, prefix: &str) -> Vec<String> {
    groups[prefix]
        .iter()
        .map(|a| a.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn groups_by_prefix_and_sorts_by_number() {
    let paths = ["/u/B2.jpg", "/u/A3.jpg", "/u/A1.jpg", "/u/B1.jpg", "/u/A2.jpg"];
    let groups = group_images(&paths);
    assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(names(&groups, "A"), vec!["A1.jpg", "A2.jpg", "A3.jpg"]);
    assert_eq!(names(&groups, "B"), vec!["B1.jpg", "B2.jpg"]);
}

#[test]
fn numeric_not_lexicographic_order() {
    let groups = group_images(&["C10.png", "C9.png", "C100.png"]);
    assert_eq!(names(&groups, "C"), vec!["C9.png", "C10.png", "C100.png"]);
}

#[test]
fn prefix_is_upper_cased_and_merges_case_variants() {
    let groups = group_images(&["scene2.png", "Scene1.png", "SCENE3.png"]);
    assert_eq!(groups.len(), 1);
    assert_eq!(
        names(&groups, "SCENE"),
        vec!["Scene1.png", "scene2.png", "SCENE3.png"]
    );
}

#[test]
fn upload_wrapper_is_stripped() {
    let groups = group_images(&[
        "/tmp/s/image_000_B2.png",
        "/tmp/s/image_001_A1.png",
        "/tmp/s/image_002_B1.png",
    ]);
    assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    assert_eq!(
        names(&groups, "B"),
        vec!["image_002_B1.png", "image_000_B2.png"]
    );
}

#[test]
fn names_without_letters_land_in_default() {
    let groups = group_images(&["12.png", "3.png", "image_004_7.png"]);
    assert_eq!(groups.keys().collect::<Vec<_>>(), vec![DEFAULT_PREFIX]);
    let seq: Vec<u64> = groups[DEFAULT_PREFIX].iter().map(|a| a.sequence).collect();
    assert_eq!(seq, vec![3, 7, 12]);
}

#[test]
fn missing_numbers_sort_as_zero_and_keep_input_order() {
    let groups = group_images(&["D_x.png", "D1.png", "D.png"]);
    assert_eq!(names(&groups, "D"), vec!["D_x.png", "D.png", "D1.png"]);
}

#[test]
fn sequence_comes_from_first_integer_after_prefix() {
    assert_eq!(ImageAsset::from_path("A_12_3.jpg").sequence, 12);
    assert_eq!(ImageAsset::from_path("shot-004.jpg").sequence, 4);
    assert_eq!(ImageAsset::from_path("A.jp2").sequence, 0);
    assert_eq!(
        ImageAsset::from_path("A99999999999999999999999.png").sequence,
        u64::MAX
    );
}

#[test]
fn grouping_is_idempotent() {
    let paths = ["B1.jpg", "A2.jpg", "x.png", "A1.jpg", "image_009_B0.jpg"];
    assert_eq!(group_images(&paths), group_images(&paths));
}

#[test]
fn empty_input_yields_no_groups() {
    let empty: [&str; 0] = [];
    assert!(group_images(&empty).is_empty());
}
