use crate::release::ReleaseAsset;

use super::matcher::SelectionCriteria;

/// Pick the first asset, in the order supplied, whose file name satisfies
/// both matchers.
///
/// The list is assumed to come straight from the upstream release listing;
/// ties are broken purely by position. Returns `None` when the list is empty
/// or no asset qualifies; the caller maps that to a client-facing error.
pub fn select<'a>(
    assets: &'a [ReleaseAsset],
    criteria: &SelectionCriteria<'_>,
) -> Option<&'a ReleaseAsset> {
    assets
        .iter()
        .find(|asset| criteria.qualifies(asset.file_name()))
}
