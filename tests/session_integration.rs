// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests of a control session driving a channel-backed sink.

use std::sync::Arc;
use std::time::Duration;

use chanctl::codec::{InboundCommand, ValueCodec};
use chanctl::descriptor::{ChannelType, ValueDescriptor};
use chanctl::error::{DecodeError, Error};
use chanctl::event::ChannelEvent;
use chanctl::{
    ChannelId, ChannelSink, DomainValue, GestureActions, GestureOutcome, HsbColor, Session,
    SessionConfig, TimingConfig,
};
use tokio::sync::mpsc;
use tokio::time::sleep;

fn session() -> (Session, mpsc::UnboundedReceiver<chanctl::OutboundCommand>) {
    let (sink, outbound) = ChannelSink::new();
    (Session::new(Arc::new(sink)), outbound)
}

fn drain(outbound: &mut mpsc::UnboundedReceiver<chanctl::OutboundCommand>) -> Vec<String> {
    std::iter::from_fn(|| outbound.try_recv().ok())
        .map(|command| command.payload)
        .collect()
}

// ============================================================================
// Inbound values
// ============================================================================

mod inbound {
    use super::*;

    #[tokio::test]
    async fn garbled_reading_keeps_last_display() {
        let (session, _) = session();
        let temperature = ChannelId::new("hall:temperature");
        session.bind(
            temperature.clone(),
            ValueCodec::Number,
            ValueDescriptor::new().with_format_pattern("%.1f %unit%").read_only(),
        );
        let mut display = session.watch_display(&temperature).unwrap();

        session.apply_wire(&temperature, "21.46 °C").unwrap();
        display.changed().await.unwrap();
        assert_eq!(*display.borrow_and_update(), "21.5 °C");

        let err = session.apply_wire(&temperature, "abc").unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::NotANumber(_))));
        assert_eq!(session.display(&temperature).as_deref(), Some("21.5 °C"));
        assert!(!display.has_changed().unwrap());
        assert_eq!(
            session.value(&temperature),
            Some(DomainValue::numeric_with_unit(21.46, "°C"))
        );
    }

    #[tokio::test]
    async fn contact_sensor_reads_inverted_literals() {
        let (session, _) = session();
        let door = ChannelId::new("hall:door");
        let binding = session.bind(
            door.clone(),
            ValueCodec::OnOff,
            ValueDescriptor::on_off("open", "closed").receive_only().with_inverse(true),
        );
        assert_eq!(binding.channel_type(), ChannelType::Contact);
        assert!(binding.state_description().read_only);

        session.apply_wire(&door, "closed").unwrap();
        assert_eq!(session.display(&door).as_deref(), Some("OPEN"));

        // Sensors accept no outbound values
        assert!(session.submit(&door, DomainValue::boolean(false)).is_err());
    }
}

// ============================================================================
// Outbound commands
// ============================================================================

mod outbound {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn slider_drag_sends_final_value() {
        let (session, mut outbound) = session();
        let dimmer = ChannelId::new("lamp:dimmer");
        session.bind(
            dimmer.clone(),
            ValueCodec::Number,
            ValueDescriptor::new().with_bounds(0.0, 100.0).with_unit("%"),
        );
        let mut events = session.subscribe();

        for level in [5.0, 12.0, 9.0] {
            session.submit(&dimmer, DomainValue::numeric(level)).unwrap();
            sleep(Duration::from_millis(20)).await;
        }
        // Optimistic display, nothing sent yet
        assert_eq!(session.display(&dimmer).as_deref(), Some("9 %"));
        assert!(drain(&mut outbound).is_empty());

        sleep(Duration::from_millis(300)).await;
        assert_eq!(drain(&mut outbound), vec!["9".to_string()]);

        let sent: Vec<ChannelEvent> = std::iter::from_fn(|| events.try_recv().ok())
            .filter(ChannelEvent::is_command)
            .collect();
        assert_eq!(sent.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_value_is_not_sent() {
        let (session, mut outbound) = session();
        let dimmer = ChannelId::new("lamp:dimmer");
        session.bind(dimmer.clone(), ValueCodec::Number, ValueDescriptor::new().with_bounds(0.0, 100.0));

        assert!(matches!(
            session.submit(&dimmer, DomainValue::numeric(101.0)),
            Err(Error::Value(_))
        ));
        sleep(Duration::from_secs(1)).await;
        assert!(drain(&mut outbound).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn color_commands_are_encoded_as_triples() {
        let (session, mut outbound) = session();
        let color = ChannelId::new("lamp:color");
        session.bind(color.clone(), ValueCodec::Color, ValueDescriptor::new());

        session
            .command(&color, &InboundCommand::Hsb(HsbColor::new(120.0, 50.0, 99.2).unwrap()))
            .unwrap();
        session.command(&color, &InboundCommand::OnOff(false)).unwrap();
        assert!(session.flush(&color));

        assert_eq!(drain(&mut outbound), vec!["0,0,0".to_string()]);
        assert_eq!(session.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_color_is_not_sent() {
        let (session, mut outbound) = session();
        let color = ChannelId::new("lamp:color");
        session.bind(color.clone(), ValueCodec::Color, ValueDescriptor::new());

        assert!(matches!(
            session.submit(&color, DomainValue::from(HsbColor::clamped(f64::NAN, 50.0, 50.0))),
            Err(Error::Value(_))
        ));
        let parsed: serde_json::Result<InboundCommand> =
            serde_json::from_str(r#"{"type":"hsb","value":{"hue":400,"saturation":50,"brightness":50}}"#);
        assert!(parsed.is_err());

        sleep(Duration::from_secs(1)).await;
        assert!(drain(&mut outbound).is_empty());
        assert_eq!(session.value(&color), None);
    }

    #[tokio::test(start_paused = true)]
    async fn configured_window_is_used() {
        let (sink, mut outbound) = ChannelSink::new();
        let config = SessionConfig::default()
            .with_timing(TimingConfig::default().with_debounce_window(Duration::from_millis(50)));
        let session = Session::with_config(Arc::new(sink), config);
        let power = ChannelId::new("lamp:power");
        session.bind(power.clone(), ValueCodec::OnOff, ValueDescriptor::new());

        session.submit(&power, DomainValue::boolean(true)).unwrap();
        sleep(Duration::from_millis(60)).await;
        assert_eq!(drain(&mut outbound), vec!["ON".to_string()]);
    }
}

// ============================================================================
// Gestures and teardown
// ============================================================================

mod lifecycle {
    use super::*;

    fn transport(session: &Session) -> ChannelId {
        let id = ChannelId::new("tv:transport");
        session.bind(id.clone(), ValueCodec::Text, ValueDescriptor::new());
        session
            .bind_gesture(
                &id,
                GestureActions::new(DomainValue::text("PREVIOUS"), DomainValue::text("REWIND"))
                    .with_settle(DomainValue::text("PLAY")),
            )
            .unwrap();
        id
    }

    #[tokio::test(start_paused = true)]
    async fn tap_and_hold_through_session() {
        let (session, mut outbound) = session();
        let id = transport(&session);

        session.press(&id).unwrap();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(session.release(&id).unwrap(), GestureOutcome::Tap);

        session.press(&id).unwrap();
        sleep(Duration::from_millis(700)).await;
        assert_eq!(session.release(&id).unwrap(), GestureOutcome::Hold);

        assert_eq!(
            drain(&mut outbound),
            vec!["PREVIOUS".to_string(), "REWIND".to_string(), "PLAY".to_string()]
        );
    }

    #[tokio::test]
    async fn gesture_on_sensor_is_refused() {
        let (session, _) = session();
        let door = ChannelId::new("hall:door");
        session.bind(door.clone(), ValueCodec::OnOff, ValueDescriptor::new().receive_only());

        let err = session
            .bind_gesture(
                &door,
                GestureActions::new(DomainValue::boolean(true), DomainValue::boolean(false)),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Value(_)));
        assert!(matches!(session.press(&door), Err(Error::ChannelNotBound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_session_cancels_timers() {
        let (session, mut outbound) = session();
        let id = transport(&session);
        let dimmer = ChannelId::new("lamp:dimmer");
        session.bind(dimmer.clone(), ValueCodec::Number, ValueDescriptor::new());

        session.submit(&dimmer, DomainValue::numeric(30.0)).unwrap();
        session.press(&id).unwrap();
        drop(session);

        sleep(Duration::from_secs(1)).await;
        assert!(drain(&mut outbound).is_empty());
    }
}
