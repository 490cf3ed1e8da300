//! Action tags and their decoded payloads.

pub mod camera;
pub mod dataset;
pub mod query;
pub mod storage;
pub mod surface;

pub use camera::FlyToRequest;
pub use dataset::{
    AddDatasetRequest, DataCatalogUpdate, DatasetDescriptor, DatasetRef, OverridesUpdated,
    SourceConfig, UpdateDatasetRequest, UpdateVisibilityRequest,
};
pub use query::{LayerQueryResponse, SelectionResponse};
pub use storage::{DataKeyRequest, DataKeysResponse, DataValueResponse, SaveDataRequest};
pub use surface::{BuildingSearchOverrideRequest, HighlightOverride, OpenPopupRequest};

use crate::envelope::Message;
use crate::error::DecodeError;

/// Known action names.
pub mod names {
    // Inbound: dataset lifecycle
    pub const ADD_DATASET: &str = "addDatasetToScene";
    pub const UPDATE_DATASET: &str = "updateDatasetInScene";
    pub const UPDATE_VISIBILITY: &str = "updateDatasetVisibility";
    pub const REMOVE_DATASET: &str = "removeDatasetFromScene";
    pub const REMOVE_ALL_DATASETS: &str = "removeAllDatasetsFromScene";

    // Inbound: snapshot queries
    pub const FIND_LAYER: &str = "findLayerByDataID";
    pub const GET_OVERRIDDEN_LAYER: &str = "getOverriddenLayerByDataID";
    pub const GET_SELECTION: &str = "getSelection";

    // Inbound: surfaces
    pub const OPEN_POPUP: &str = "openPopup";
    pub const CLOSE_POPUP: &str = "closePopup";
    pub const OPEN_MODAL: &str = "openModal";
    pub const CLOSE_MODAL: &str = "closeModal";
    pub const BUILDING_SEARCH_OVERRIDE: &str = "buildingSearchOverride";

    // Inbound: storage
    pub const SAVE_DATA: &str = "saveData";
    pub const GET_DATA: &str = "getData";
    pub const REMOVE_DATA: &str = "removeData";
    pub const LIST_DATA_KEYS: &str = "listDataKeys";

    // Inbound: camera
    pub const FLY_TO: &str = "flyTo";

    // Outbound only
    pub const UPDATE_DATA_CATALOG: &str = "updateDataCatalog";
    pub const DATASET_OVERRIDES_UPDATED: &str = "datasetOverridesUpdated";
    pub const HIGHLIGHT_OVERRIDE: &str = "highlightOverride";
}

/// A decoded inbound message, one variant per recognized action.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundAction {
    AddDataset(AddDatasetRequest),
    UpdateDataset(UpdateDatasetRequest),
    UpdateVisibility(UpdateVisibilityRequest),
    RemoveDataset(DatasetRef),
    RemoveAllDatasets,
    FindLayer(DatasetRef),
    GetOverriddenLayer(DatasetRef),
    GetSelection,
    OpenPopup(OpenPopupRequest),
    ClosePopup,
    OpenModal,
    CloseModal,
    BuildingSearchOverride(BuildingSearchOverrideRequest),
    SaveData(SaveDataRequest),
    GetData(DataKeyRequest),
    RemoveData(DataKeyRequest),
    ListDataKeys,
    FlyTo(FlyToRequest),
}

impl InboundAction {
    /// Decode and validate a message against the schema of its action.
    pub fn decode(message: &Message) -> Result<Self, DecodeError> {
        let action = match message.action.as_str() {
            names::ADD_DATASET => Self::AddDataset(message.payload_as(names::ADD_DATASET)?),
            names::UPDATE_DATASET => Self::UpdateDataset(message.payload_as(names::UPDATE_DATASET)?),
            names::UPDATE_VISIBILITY => {
                Self::UpdateVisibility(message.payload_as(names::UPDATE_VISIBILITY)?)
            }
            names::REMOVE_DATASET => Self::RemoveDataset(message.payload_as(names::REMOVE_DATASET)?),
            names::REMOVE_ALL_DATASETS => Self::RemoveAllDatasets,
            names::FIND_LAYER => Self::FindLayer(message.payload_as(names::FIND_LAYER)?),
            names::GET_OVERRIDDEN_LAYER => {
                Self::GetOverriddenLayer(message.payload_as(names::GET_OVERRIDDEN_LAYER)?)
            }
            names::GET_SELECTION => Self::GetSelection,
            names::OPEN_POPUP => Self::OpenPopup(match message.payload {
                Some(_) => message.payload_as(names::OPEN_POPUP)?,
                None => OpenPopupRequest::default(),
            }),
            names::CLOSE_POPUP => Self::ClosePopup,
            names::OPEN_MODAL => Self::OpenModal,
            names::CLOSE_MODAL => Self::CloseModal,
            names::BUILDING_SEARCH_OVERRIDE => {
                Self::BuildingSearchOverride(message.payload_as(names::BUILDING_SEARCH_OVERRIDE)?)
            }
            names::SAVE_DATA => Self::SaveData(message.payload_as(names::SAVE_DATA)?),
            names::GET_DATA => Self::GetData(message.payload_as(names::GET_DATA)?),
            names::REMOVE_DATA => Self::RemoveData(message.payload_as(names::REMOVE_DATA)?),
            names::LIST_DATA_KEYS => Self::ListDataKeys,
            names::FLY_TO => Self::FlyTo(message.payload_as(names::FLY_TO)?),
            other => return Err(DecodeError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }

    /// The wire name of this action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddDataset(_) => names::ADD_DATASET,
            Self::UpdateDataset(_) => names::UPDATE_DATASET,
            Self::UpdateVisibility(_) => names::UPDATE_VISIBILITY,
            Self::RemoveDataset(_) => names::REMOVE_DATASET,
            Self::RemoveAllDatasets => names::REMOVE_ALL_DATASETS,
            Self::FindLayer(_) => names::FIND_LAYER,
            Self::GetOverriddenLayer(_) => names::GET_OVERRIDDEN_LAYER,
            Self::GetSelection => names::GET_SELECTION,
            Self::OpenPopup(_) => names::OPEN_POPUP,
            Self::ClosePopup => names::CLOSE_POPUP,
            Self::OpenModal => names::OPEN_MODAL,
            Self::CloseModal => names::CLOSE_MODAL,
            Self::BuildingSearchOverride(_) => names::BUILDING_SEARCH_OVERRIDE,
            Self::SaveData(_) => names::SAVE_DATA,
            Self::GetData(_) => names::GET_DATA,
            Self::RemoveData(_) => names::REMOVE_DATA,
            Self::ListDataKeys => names::LIST_DATA_KEYS,
            Self::FlyTo(_) => names::FLY_TO,
        }
    }
}
