//! End-to-end conversations through the session manager.

use std::sync::Arc;

use chrono::NaiveDate;
use parley_action::handler::booking::TIME_PROMPT;
use parley_action::handler::fallback::FALLBACK_RESPONSES;
use parley_action::validation::{DateValidator, TimeValidator};
use parley_action::{
    FixedChooser, FixedClock, SequentialIdGenerator, Services, StaticWeatherProvider,
};
use parley_chat::{SessionManager, TurnResolution};
use parley_core::types::{SlotMutation, SlotValue, TurnInput};
use parley_core::ParleyConfig;

fn services() -> Services {
    Services {
        clock: Arc::new(FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 1, 16)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
        )),
        ids: Arc::new(SequentialIdGenerator::new("BOOK-")),
        chooser: Arc::new(FixedChooser(0)),
        weather: Arc::new(StaticWeatherProvider {
            condition: "sunny".to_string(),
            temperature_c: 22,
            humidity_pct: 65,
        }),
    }
}

fn manager() -> SessionManager {
    SessionManager::from_config(&ParleyConfig::default(), services())
}

#[test]
fn test_book_with_time_confirms_and_sets_flag() {
    let manager = manager();
    let id = manager.create_session().unwrap();

    let report = manager
        .handle(id, &TurnInput::new("book_appointment").with_entity("time", "3pm"))
        .unwrap();

    assert_eq!(report.resolution, TurnResolution::Completed);
    assert!(report.response_text().contains("3pm"));
    assert_eq!(
        report.committed,
        vec![
            SlotMutation::set("appointment_time", "3pm"),
            SlotMutation::set("appointment_confirmed", true),
        ]
    );
    let slots = manager.slots(id).unwrap();
    assert_eq!(slots.get("appointment_confirmed"), Some(&SlotValue::from(true)));
}

#[test]
fn test_book_without_time_prompts_and_commits_nothing() {
    let manager = manager();
    let id = manager.create_session().unwrap();

    let report = manager
        .handle(
            id,
            &TurnInput::new("book_appointment")
                .with_entity("date", "tomorrow")
                .with_entity("person", "Dr. Lee"),
        )
        .unwrap();

    assert_eq!(report.response_text(), TIME_PROMPT);
    assert_eq!(
        report.resolution,
        TurnResolution::MissingSlot {
            slot: "appointment_time".to_string()
        }
    );
    assert!(report.committed.is_empty());
    assert!(manager.slots(id).unwrap().is_empty());
}

#[test]
fn test_time_supplied_on_a_later_turn_completes_booking() {
    let manager = manager();
    let id = manager.create_session().unwrap();

    manager
        .handle(id, &TurnInput::new("book_appointment"))
        .unwrap();
    let report = manager
        .handle(id, &TurnInput::new("book_appointment").with_entity("time", "10:30"))
        .unwrap();
    assert!(report
        .response_text()
        .starts_with("Your appointment is confirmed for 10:30."));
}

#[test]
fn test_invalid_date_is_rejected_without_touching_slots() {
    let manager = manager();
    let id = manager.create_session().unwrap();
    manager
        .handle(id, &TurnInput::new("get_weather").with_entity("location", "Oslo"))
        .unwrap();

    let report = manager
        .handle(
            id,
            &TurnInput::new("book_dated_appointment")
                .with_entity("date", "someday")
                .with_entity("time", "3pm"),
        )
        .unwrap();

    assert_eq!(report.response_text(), DateValidator::PROMPT);
    assert!(report.committed.is_empty());
    let slots = manager.slots(id).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots.text("location"), Some("Oslo"));
}

#[test]
fn test_invalid_time_is_rejected() {
    let manager = manager();
    let id = manager.create_session().unwrap();
    let report = manager
        .handle(id, &TurnInput::new("book_appointment").with_entity("time", "later"))
        .unwrap();
    assert_eq!(report.response_text(), TimeValidator::PROMPT);
    assert!(manager.slots(id).unwrap().is_empty());
}

#[test]
fn test_dated_booking_records_booking_id() {
    let manager = manager();
    let id = manager.create_session().unwrap();
    let report = manager
        .handle(
            id,
            &TurnInput::new("book_dated_appointment")
                .with_entity("date", "Monday")
                .with_entity("time", "2:00 PM"),
        )
        .unwrap();
    assert!(report.response_text().contains("Booking ID: BOOK-0001"));
    assert_eq!(manager.slots(id).unwrap().text("booking_id"), Some("BOOK-0001"));
}

#[test]
fn test_faq_hours() {
    let manager = manager();
    let id = manager.create_session().unwrap();
    let report = manager
        .handle(id, &TurnInput::new("faq").with_utterance("what are your hours?"))
        .unwrap();
    assert_eq!(
        report.response_text(),
        "We're open Monday-Friday 9AM-6PM, weekends 10AM-4PM."
    );
}

#[test]
fn test_unknown_intent_falls_back_and_leaves_slots() {
    let manager = manager();
    let id = manager.create_session().unwrap();
    manager
        .handle(id, &TurnInput::new("get_weather").with_entity("location", "Oslo"))
        .unwrap();
    let before = manager.slots(id).unwrap();

    let report = manager
        .handle(id, &TurnInput::new("gibberish_intent_xyz"))
        .unwrap();

    assert_eq!(report.resolution, TurnResolution::Fallback);
    assert!(FALLBACK_RESPONSES.contains(&report.response_text()));
    assert_eq!(manager.slots(id).unwrap(), before);
}

#[test]
fn test_session_start_resets_all_slots() {
    let manager = manager();
    let id = manager.create_session().unwrap();
    manager
        .handle(id, &TurnInput::new("get_weather").with_entity("location", "Oslo"))
        .unwrap();
    manager
        .handle(id, &TurnInput::new("book_appointment").with_entity("time", "3pm"))
        .unwrap();
    assert_eq!(manager.slots(id).unwrap().len(), 3);

    let report = manager.handle(id, &TurnInput::new("session_start")).unwrap();
    assert!(report.response.is_none());
    assert_eq!(report.response_text(), "");
    assert!(manager.slots(id).unwrap().is_empty());
}

#[test]
fn test_time_uses_injected_clock() {
    let manager = manager();
    let id = manager.create_session().unwrap();
    let report = manager.handle(id, &TurnInput::new("get_time")).unwrap();
    assert_eq!(
        report.response_text(),
        "The current time is 02:05 PM on Tuesday, January 16, 2024."
    );
    assert!(report.committed.is_empty());
}

#[test]
fn test_config_alias_routes_intent() {
    let mut config = ParleyConfig::default();
    config
        .intents
        .aliases
        .insert("weather.get".to_string(), "get_weather".to_string());
    let manager = SessionManager::from_config(&config, services());
    let id = manager.create_session().unwrap();
    let report = manager.handle(id, &TurnInput::new("weather.get")).unwrap();
    assert_eq!(report.action, "get_weather");
    assert!(report.response_text().contains("your area"));
}

#[test]
fn test_mutation_log_serialises_for_trackers() {
    let manager = manager();
    let id = manager.create_session().unwrap();
    manager
        .handle(id, &TurnInput::new("book_appointment").with_entity("time", "3pm"))
        .unwrap();
    let log = manager.mutation_log(id).unwrap();
    let json = serde_json::to_value(&log).unwrap();
    assert_eq!(json[1]["mutation"]["op"], "set");
    assert_eq!(json[1]["mutation"]["slot"], "appointment_time");
    assert_eq!(json[2]["mutation"]["value"], true);
}

#[tokio::test]
async fn test_sessions_are_isolated_across_tasks() {
    let manager = Arc::new(manager());
    let mut handles = Vec::new();

    for city in ["Oslo", "Lisbon", "Tokyo", "Quito"] {
        let manager = Arc::clone(&manager);
        handles.push(tokio::task::spawn_blocking(move || {
            let id = manager.create_session().unwrap();
            for _ in 0..10 {
                manager
                    .handle(id, &TurnInput::new("get_weather").with_entity("location", city))
                    .unwrap();
            }
            (id, city)
        }));
    }

    for handle in handles {
        let (id, city) = handle.await.unwrap();
        let slots = manager.slots(id).unwrap();
        assert_eq!(slots.text("location"), Some(city));
        assert_eq!(slots.len(), 1);
    }
    assert_eq!(manager.session_count().unwrap(), 4);
}

#[test]
fn test_session_start_clears_slots_despite_invalid_date_entity() {
    let manager = manager();
    let id = manager.create_session().unwrap();
    manager
        .handle(id, &TurnInput::new("get_weather").with_entity("location", "Oslo"))
        .unwrap();

    let report = manager
        .handle(id, &TurnInput::new("session_start").with_entity("date", "soon"))
        .unwrap();

    assert_eq!(report.resolution, TurnResolution::Completed);
    assert!(report.response.is_none());
    assert!(manager.slots(id).unwrap().is_empty());
}

#[test]
fn test_weather_answers_despite_invalid_time_entity() {
    let manager = manager();
    let id = manager.create_session().unwrap();

    let report = manager
        .handle(
            id,
            &TurnInput::new("get_weather")
                .with_entity("location", "Oslo")
                .with_entity("time", "later"),
        )
        .unwrap();

    assert_eq!(report.resolution, TurnResolution::Completed);
    assert!(report.response_text().contains("Oslo"));
    assert!(report.response_text().contains("sunny"));
    assert!(!manager.slots(id).unwrap().is_set("appointment_time"));
}

#[test]
fn test_booking_keeps_entity_value_verbatim() {
    let manager = manager();
    let id = manager.create_session().unwrap();

    let report = manager
        .handle(id, &TurnInput::new("book_appointment").with_entity("time", " 3pm "))
        .unwrap();

    assert_eq!(report.resolution, TurnResolution::Completed);
    let slots = manager.slots(id).unwrap();
    assert_eq!(slots.get("appointment_time"), Some(&SlotValue::from(" 3pm ")));
}
