mod domain_event_watch_list;
pub(crate) mod domain_events;
mod event_sink;
pub(crate) mod opaque_domain_event;

pub use domain_event_watch_list::DomainEvent;
pub(crate) use domain_event_watch_list::WatchListDomainEvents;
pub use domain_event_watch_list::Watchers;
pub(crate) use event_sink::EventSink;
