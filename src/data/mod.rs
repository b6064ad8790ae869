/// Data layer: the display-independent summarization core.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, normalize headers → Table (cached)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  view request → routes → explode / stats
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ payloads  │  frequency / distribution / heatmap / scatter
///   └──────────┘
/// ```
///
/// Everything below this module is pure data: the egui layer consumes
/// [`view::Payload`] values and owns all styling and widgets.

pub mod error;
pub mod explode;
pub mod loader;
pub mod model;
pub mod stats;
pub mod view;
