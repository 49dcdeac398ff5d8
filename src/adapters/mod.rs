//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements      | Connects to                    |
//! |----------------|-----------------|--------------------------------|
//! | `memory_store` | CollectionPort  | in-memory maps, postcard files |
//! | `media`        | MediaPort       | media directory / memory       |
//! | `strings`      | StringsPort     | bundled + on-disk `.ftl` text  |
//! | `log_sink`     | EventSink       | `log` records / test recorder  |

pub mod log_sink;
pub mod media;
pub mod memory_store;
pub mod strings;
