//! Static field correspondence between persisted entities and wire DTOs.
//!
//! Every entity spells out its mapping by hand; there is no reflection or
//! name-based convention. Asset references are deliberately absent from
//! these mappings and are only written through [`AssetField`] after the
//! asset store has accepted the upload.

use cinecat_core::types::DbId;
use cinecat_core::validation::UploadRules;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

pub trait EntityMapping: Sized + Send {
    /// Insertable shape: an entity without its store-assigned id.
    type Draft: Send;
    /// Client-facing projection used by list responses and create responses.
    type Read: Serialize + Send;
    /// Client payload for create and full replace.
    type Create: Validate + Send + Sync;
    /// The projection patch documents address.
    type Patch: Serialize + DeserializeOwned + Validate + Send;

    fn id(&self) -> DbId;

    /// ToDTO.
    fn to_read(self) -> Self::Read;

    /// ToEntity. Relation lists become join rows with only their foreign key
    /// (and whatever the payload carries) populated.
    fn to_draft(input: &Self::Create) -> Self::Draft;

    /// ApplyUpdate: overwrite every mapped field of `self` from `input`.
    fn apply_update(&mut self, input: &Self::Create);

    fn to_patch(&self) -> Self::Patch;

    /// Write a validated patch projection back onto the tracked entity.
    fn merge_patch(&mut self, patch: Self::Patch);
}

/// An entity carrying one optional binary asset reference.
pub trait AssetField: EntityMapping {
    /// Asset store container (bucket) for this entity's assets.
    const CONTAINER: &'static str;
    /// Name of the asset field in payloads and error reports.
    const FIELD: &'static str;
    const RULES: UploadRules;

    fn asset(&self) -> Option<&str>;

    fn set_asset(&mut self, reference: String);

    fn set_draft_asset(draft: &mut Self::Draft, reference: String);
}
