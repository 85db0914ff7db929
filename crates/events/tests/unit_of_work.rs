//! End-to-end unit-of-work flow: raise, copy-on-write update, coordinate,
//! dispatch, clear.

use core::any::Any;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use domainkit_core::{AggregateId, CausationId, CorrelationId, Entity, HasId};
use domainkit_events::{
    Clock, DomainEvent, EventBuffer, EventBearer, EventBus, EventCollector, EventDispatcher,
    EventMetadata, FixedClock, InMemoryEventBus, RichDomainEvent, RichEventMetadata,
    coordinate_update, share,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[derive(Debug)]
struct OrderPlaced {
    metadata: RichEventMetadata,
}

impl DomainEvent for OrderPlaced {
    fn metadata(&self) -> &EventMetadata {
        &self.metadata.base
    }

    fn event_type(&self) -> &'static str {
        "order.placed"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RichDomainEvent for OrderPlaced {
    fn rich_metadata(&self) -> &RichEventMetadata {
        &self.metadata
    }
}

#[derive(Debug)]
struct OrderPaid {
    metadata: RichEventMetadata,
}

impl DomainEvent for OrderPaid {
    fn metadata(&self) -> &EventMetadata {
        &self.metadata.base
    }

    fn event_type(&self) -> &'static str {
        "order.paid"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl RichDomainEvent for OrderPaid {
    fn rich_metadata(&self) -> &RichEventMetadata {
        &self.metadata
    }
}

/// Order modeled as an immutable value: operations return new instances.
/// The event buffer is the one mutable bookkeeping channel, composed in.
#[derive(Debug)]
struct Order {
    id: u64,
    stream_id: AggregateId,
    version: u64,
    paid: bool,
    events: EventBuffer,
}

impl Order {
    fn place(id: u64, clock: &dyn Clock, correlation_id: CorrelationId) -> Self {
        let stream_id = AggregateId::new();
        let metadata = RichEventMetadata::new(
            clock,
            correlation_id,
            CausationId::new(),
            stream_id,
            1,
        );

        let mut order = Order {
            id,
            stream_id,
            version: 1,
            paid: false,
            events: EventBuffer::new(),
        };
        order.events.record(OrderPlaced { metadata });
        order
    }

    /// Copy-on-write payment: the returned instance carries only the newly
    /// raised event; earlier events stay on `self` until coordinated over.
    fn paid(&self, clock: &dyn Clock, correlation_id: CorrelationId, caused_by: CausationId) -> Self {
        let metadata = RichEventMetadata::new(
            clock,
            correlation_id,
            caused_by,
            self.stream_id,
            self.version + 1,
        );

        let mut next = Order {
            id: self.id,
            stream_id: self.stream_id,
            version: self.version + 1,
            paid: true,
            events: EventBuffer::new(),
        };
        next.events.record(OrderPaid { metadata });
        next
    }
}

impl HasId for Order {
    type Id = u64;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for Order {}

impl EventBearer for Order {
    fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

fn t1() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
}

fn t2() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 5).unwrap()
}

#[test]
fn copy_on_write_update_preserves_history_and_dispatches_once() {
    init_tracing();

    let correlation_id = CorrelationId::new();

    // Raise E1 on the first instance.
    let order = Order::place(7, &FixedClock(t1()), correlation_id);
    assert_eq!(order.domain_events().len(), 1);
    let e1_id = order.domain_events()[0].event_id();

    // Copy-on-write update raises E2 on a new instance representing "order
    // after payment". Same domain identity, distinct instance.
    let updated = order.paid(&FixedClock(t2()), correlation_id, CausationId::from(*e1_id.as_uuid()));
    assert!(order.same_entity_as(&updated));
    assert!(updated.paid && !order.paid);
    assert_eq!(updated.domain_events().len(), 1);

    // Coordinate: carry E1 over and track the new instance.
    let mut collector = EventCollector::new();
    let shared = coordinate_update(share(updated), &order, &mut collector).unwrap();

    {
        let guard = shared.lock().unwrap();
        let events = guard.domain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type(), "order.placed");
        assert_eq!(events[1].event_type(), "order.paid");
        assert_eq!(events[0].occurred_at(), t1());
        assert_eq!(events[1].occurred_at(), t2());
        assert_eq!(events[0].event_id(), e1_id);
    }

    // Re-tracking the same instance must not create a duplicate entry.
    collector.track_aggregate(shared.clone());
    assert_eq!(collector.len(), 1);

    // Dispatch: both events delivered, in causal order, exactly once.
    let dispatcher = EventDispatcher::new(InMemoryEventBus::new());
    let sub = dispatcher.bus().subscribe();
    let published = dispatcher.dispatch_and_clear(&mut collector).unwrap();
    assert_eq!(published, 2);

    let first: Arc<dyn DomainEvent> = sub.try_recv().unwrap();
    let second: Arc<dyn DomainEvent> = sub.try_recv().unwrap();
    assert!(sub.try_recv().is_err());

    let placed = first.as_any().downcast_ref::<OrderPlaced>().unwrap();
    let paid = second.as_any().downcast_ref::<OrderPaid>().unwrap();

    assert_eq!(placed.aggregate_version(), 1);
    assert_eq!(paid.aggregate_version(), 2);
    assert_eq!(placed.correlation_id(), paid.correlation_id());
    assert_eq!(paid.causation_id(), CausationId::from(*e1_id.as_uuid()));
    assert_eq!(placed.event_version(), 1);

    // Everything drained: buffer and tracked set are empty.
    assert!(shared.lock().unwrap().domain_events().is_empty());
    assert!(collector.is_empty());
}

#[test]
fn events_survive_a_chain_of_copy_on_write_updates() {
    init_tracing();

    let correlation_id = CorrelationId::new();
    let mut collector = EventCollector::new();

    let v1 = Order::place(7, &FixedClock(t1()), correlation_id);
    let v2 = v1.paid(&FixedClock(t2()), correlation_id, CausationId::new());
    let shared_v2 = coordinate_update(share(v2), &v1, &mut collector).unwrap();

    // A further update in the same unit of work starts from the shared state.
    let v3 = {
        let guard = shared_v2.lock().unwrap();
        guard.paid(&FixedClock(t2()), correlation_id, CausationId::new())
    };
    let shared_v3 = {
        let guard = shared_v2.lock().unwrap();
        coordinate_update(share(v3), &guard, &mut collector).unwrap()
    };

    // v2 and v3 are distinct instances of the same logical entity; both are
    // tracked, and v3 carries the full history.
    assert_eq!(collector.len(), 2);
    assert_eq!(shared_v3.lock().unwrap().domain_events().len(), 3);

    let dispatcher = EventDispatcher::new(InMemoryEventBus::new());
    let published = dispatcher.dispatch_and_clear(&mut collector).unwrap();

    // v2's two events plus v3's three: the dispatcher publishes what each
    // tracked instance holds. Subscribers deduplicate by event id if both
    // instances of an entity were tracked (at-least-once delivery).
    assert_eq!(published, 5);
    assert!(collector.is_empty());
    assert!(shared_v2.lock().unwrap().domain_events().is_empty());
    assert!(shared_v3.lock().unwrap().domain_events().is_empty());
}
