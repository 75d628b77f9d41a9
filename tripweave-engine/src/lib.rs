//! Tripweave engine - the request aggregation pipeline.
//!
//! One logical request fans out into independent per-category upstream
//! calls, the results are merged and deduplicated deterministically, and
//! every outbound sub-request sits behind the content-addressed cache
//! from `tripweave-cache`. The modules compose bottom-up:
//!
//! - [`fanout`]: issue named sub-operations concurrently, join at one
//!   barrier, surface per-name results;
//! - [`reduce`]: deduplicate and rank merged recommendation lists;
//! - [`taste`]: the all-or-nothing taste-graph aggregate;
//! - [`context`]: the each-signal-optional environmental aggregate;
//! - [`planner`]: context bundle to prompt to one generation call;
//! - [`surface`]: the cache-backed request/response operations.

pub mod context;
pub mod fanout;
pub mod planner;
pub mod prompt;
pub mod reduce;
pub mod surface;
pub mod taste;

#[cfg(test)]
pub(crate) mod testutil;

pub use context::{ContextService, EnvironmentContext};
pub use fanout::{fan_out, require_all, SubOperation};
pub use planner::{ActivityOption, ActivityOptions, ActivityPlanner, ActivityRequest};
pub use reduce::reduce;
pub use surface::{
    AirQualityQuery, GeocodeQuery, IsCityQuery, PollenQuery, Response, RouteQuery, Surface,
    TasteQuery, TodayQuery, VenueQuery, WeatherQuery,
};
pub use taste::TasteService;
