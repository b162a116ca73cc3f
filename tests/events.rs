use distkit::events::{EventBus, EventsError};

#[test]
fn publishes_to_subscribers_in_subscription_order() {
    let mut bus: EventBus<i32, i32> = EventBus::new();
    bus.add("calc", |_, n| n + 1);
    bus.add("calc", |_, n| n * 2);
    bus.add("other", |_, n| n - 100);

    assert_eq!(bus.publish("calc", &10), vec![11, 20]);
    assert_eq!(bus.publish("other", &10), vec![-90]);
}

#[test]
fn publishing_without_subscribers_yields_nothing() {
    let bus: EventBus<String, ()> = EventBus::new();
    assert!(bus.publish("nobody-home", &"hi".to_string()).is_empty());
}

#[test]
fn handlers_receive_the_event_name() {
    let mut bus: EventBus<(), String> = EventBus::new();
    bus.add("ping", |event, _| format!("got {event}"));
    assert_eq!(bus.publish("ping", &()), vec!["got ping"]);
}

#[test]
fn removal_uses_the_subscription_token() {
    let mut bus: EventBus<i32, i32> = EventBus::new();
    let first = bus.add("calc", |_, n| n + 1);
    let second = bus.add("calc", |_, n| n * 2);
    assert_eq!(bus.subscribers("calc"), vec![first, second]);

    bus.remove("calc", first).unwrap();
    assert_eq!(bus.subscribers("calc"), vec![second]);
    assert_eq!(bus.publish("calc", &10), vec![20]);
}

#[test]
fn removing_twice_is_an_error() {
    let mut bus: EventBus<i32> = EventBus::new();
    let id = bus.add("calc", |_, _| ());
    bus.remove("calc", id).unwrap();
    assert_eq!(
        bus.remove("calc", id),
        Err(EventsError::UnknownSubscriber {
            event: "calc".to_string()
        })
    );
}

#[test]
fn removing_from_an_unknown_event_is_an_error() {
    let mut bus: EventBus<i32> = EventBus::new();
    let id = bus.add("calc", |_, _| ());
    assert!(matches!(
        bus.remove("absent", id),
        Err(EventsError::UnknownSubscriber { .. })
    ));
}
