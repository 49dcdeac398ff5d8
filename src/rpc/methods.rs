//! Method identities on the wire.
//!
//! A method is addressed by `(service index, method index)`. The numbers
//! are part of the protocol and never reused.
//!
//! | service | idx | method                      |
//! |---------|-----|-----------------------------|
//! | 1       | 0   | GetImageForOcclusion        |
//! | 1       | 1   | AddImageOcclusionNote       |
//! | 1       | 2   | GetImageOcclusionNote       |
//! | 1       | 3   | UpdateImageOcclusionNote    |
//! | 1       | 4   | AddImageOcclusionNotetype   |
//! | 2       | 0   | TranslateString             |
//! | 2       | 1   | FormatTimespan              |
//! | 2       | 2   | I18nResources               |

use core::fmt;

pub const IMAGE_OCCLUSION_SERVICE: u32 = 1;
pub const I18N_SERVICE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodId {
    GetImageForOcclusion,
    AddImageOcclusionNote,
    GetImageOcclusionNote,
    UpdateImageOcclusionNote,
    AddImageOcclusionNotetype,
    TranslateString,
    FormatTimespan,
    I18nResources,
}

impl MethodId {
    pub const ALL: [MethodId; 8] = [
        MethodId::GetImageForOcclusion,
        MethodId::AddImageOcclusionNote,
        MethodId::GetImageOcclusionNote,
        MethodId::UpdateImageOcclusionNote,
        MethodId::AddImageOcclusionNotetype,
        MethodId::TranslateString,
        MethodId::FormatTimespan,
        MethodId::I18nResources,
    ];

    pub const fn service(self) -> u32 {
        match self {
            Self::GetImageForOcclusion
            | Self::AddImageOcclusionNote
            | Self::GetImageOcclusionNote
            | Self::UpdateImageOcclusionNote
            | Self::AddImageOcclusionNotetype => IMAGE_OCCLUSION_SERVICE,
            Self::TranslateString | Self::FormatTimespan | Self::I18nResources => I18N_SERVICE,
        }
    }

    pub const fn index(self) -> u32 {
        match self {
            Self::GetImageForOcclusion | Self::TranslateString => 0,
            Self::AddImageOcclusionNote | Self::FormatTimespan => 1,
            Self::GetImageOcclusionNote | Self::I18nResources => 2,
            Self::UpdateImageOcclusionNote => 3,
            Self::AddImageOcclusionNotetype => 4,
        }
    }

    pub fn from_parts(service: u32, method: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.service() == service && m.index() == method)
    }

    /// Mutating methods change the collection.
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::AddImageOcclusionNote
                | Self::UpdateImageOcclusionNote
                | Self::AddImageOcclusionNotetype
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::GetImageForOcclusion => "GetImageForOcclusion",
            Self::AddImageOcclusionNote => "AddImageOcclusionNote",
            Self::GetImageOcclusionNote => "GetImageOcclusionNote",
            Self::UpdateImageOcclusionNote => "UpdateImageOcclusionNote",
            Self::AddImageOcclusionNotetype => "AddImageOcclusionNotetype",
            Self::TranslateString => "TranslateString",
            Self::FormatTimespan => "FormatTimespan",
            Self::I18nResources => "I18nResources",
        }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
