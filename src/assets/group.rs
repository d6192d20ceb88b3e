use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix assigned to images whose name has no leading letters.
pub const DEFAULT_PREFIX: &str = "DEFAULT";

const UPLOAD_WRAPPER: &str = "image_";

/// An input image with its derived grouping keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub prefix: String,
    pub sequence: u64,
}

impl ImageAsset {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        let prefix = leading_alpha(&name)
            .map(|p| p.to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        let sequence = sequence_key(&name);
        Self {
            path,
            prefix,
            sequence,
        }
    }
}

/// Groups keyed by prefix, iterated in ascending prefix order.
pub type AssetGroups = BTreeMap<String, Vec<ImageAsset>>;

/// Partition `paths` into prefix groups, each sorted by sequence number.
///
/// The sort is stable: images with equal sequence numbers keep their input order.
pub fn group_images<P: AsRef<Path>>(paths: &[P]) -> AssetGroups {
    let mut groups = AssetGroups::new();
    for p in paths {
        let asset = ImageAsset::from_path(p.as_ref());
        tracing::debug!(
            path = %asset.path.display(),
            prefix = %asset.prefix,
            sequence = asset.sequence,
            "grouped image"
        );
        groups.entry(asset.prefix.clone()).or_default().push(asset);
    }
    for (prefix, assets) in &mut groups {
        assets.sort_by_key(|a| a.sequence);
        tracing::debug!(prefix = %prefix, count = assets.len(), "sorted group");
    }
    groups
}

/// Base name with any `image_<index>_` upload wrapper removed.
pub fn display_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match unwrap_upload_name(&base) {
        Some(inner) => inner.to_string(),
        None => base,
    }
}

fn unwrap_upload_name(name: &str) -> Option<&str> {
    let rest = name.strip_prefix(UPLOAD_WRAPPER)?;
    let (_index, original) = rest.split_once('_')?;
    if original.is_empty() {
        return None;
    }
    Some(original)
}

fn leading_alpha(name: &str) -> Option<&str> {
    let end = name
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(name.len());
    (end > 0).then(|| &name[..end])
}

/// First run of ASCII digits after the leading letters, searched in the stem only.
fn sequence_key(name: &str) -> u64 {
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    let after_prefix = leading_alpha(stem).map_or(stem, |p| &stem[p.len()..]);
    let Some(start) = after_prefix.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let digits = &after_prefix[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<u64>().unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/group.rs"]
mod tests;
