//! Job board core: data model and the pure list/detail state machine.
mod effect;
mod error;
mod filter;
mod job;
mod msg;
mod page;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{LoadError, LoadErrorKind};
pub use filter::{FilterChange, FilterCriteria, FilterField, FilterParseError, JobType};
pub use job::{split_list, Job, JobQuestion, JobUser, LooseId};
pub use msg::Msg;
pub use page::{PageState, ITEMS_PER_PAGE};
pub use state::{BoardState, DetailPhase, Generation, ListPhase};
pub use update::update;
pub use view_model::{
    BoardViewModel, DetailView, JobDetailView, JobRowView, ListStatus, ListViewModel,
};
