//! Engine → UI notifications.

use crate::shapes::{ShapeId, ShapeStyle};
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};

/// The selected object as the style panel sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedObject {
    pub id: ShapeId,
    pub style: ShapeStyle,
}

/// Events delivered synchronously to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EngineEvent {
    EditorModeChanged { mode: ToolKind },
    DraggingChanged { is_dragging: bool },
    ZoomChanged { zoom: f64 },
    SelectionChanged { selected: Option<SelectedObject> },
}

/// Handle returned by [`EventSink::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

type Listener = Box<dyn FnMut(&EngineEvent)>;

/// Subscriber list for [`EngineEvent`]s.
#[derive(Default)]
pub struct EventSink {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EngineEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: EngineEvent) {
        log::debug!("Engine event: {event:?}");
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_emit() {
        let mut sink = EventSink::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        sink.subscribe(move |event| log.borrow_mut().push(event.clone()));

        sink.emit(EngineEvent::ZoomChanged { zoom: 1.5 });
        assert_eq!(*seen.borrow(), vec![EngineEvent::ZoomChanged { zoom: 1.5 }]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut sink = EventSink::new();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = sink.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(sink.unsubscribe(id));
        assert!(!sink.unsubscribe(id));
        sink.emit(EngineEvent::DraggingChanged { is_dragging: true });
        assert_eq!(*count.borrow(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(EngineEvent::DraggingChanged { is_dragging: true }).unwrap();
        assert_eq!(json["type"], "draggingChanged");
        assert_eq!(json["isDragging"], true);

        let json = serde_json::to_value(EngineEvent::EditorModeChanged {
            mode: ToolKind::Rectangle,
        })
        .unwrap();
        assert_eq!(json["mode"], "rectangle");

        let json = serde_json::to_value(EngineEvent::SelectionChanged { selected: None }).unwrap();
        assert!(json["selected"].is_null());
    }
}
