// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for tap/hold discrimination under paused time.

use std::sync::Arc;
use std::time::Duration;

use chanctl::codec::ValueCodec;
use chanctl::descriptor::ValueDescriptor;
use chanctl::error::SinkError;
use chanctl::event::ChannelEvent;
use chanctl::{
    ChannelBinding, ChannelId, DomainValue, EventBus, GestureActions, GestureDiscriminator,
    GestureOutcome,
};
use parking_lot::Mutex;
use tokio::time::sleep;

const THRESHOLD: Duration = Duration::from_millis(300);

type Sent = Arc<Mutex<Vec<String>>>;

fn recording_sink() -> (Arc<dyn chanctl::CommandSink>, Sent) {
    let sent: Sent = Arc::default();
    let log = Arc::clone(&sent);
    let sink = move |_: &ChannelId, payload: &str| -> Result<(), SinkError> {
        log.lock().push(payload.to_string());
        Ok(())
    };
    let sink: Arc<dyn chanctl::CommandSink> = Arc::new(sink);
    (sink, sent)
}

fn next_button(settle: bool, events: Option<EventBus>) -> (GestureDiscriminator, Sent) {
    let (sink, sent) = recording_sink();
    let mut actions = GestureActions::new(DomainValue::text("NEXT"), DomainValue::text("FASTFORWARD"));
    if settle {
        actions = actions.with_settle(DomainValue::text("PLAY"));
    }
    let binding = ChannelBinding::new("tv:transport", ValueCodec::Text, ValueDescriptor::new());
    let gesture = GestureDiscriminator::with_options(binding, actions, sink, THRESHOLD, events);
    (gesture, sent)
}

// ============================================================================
// Classification
// ============================================================================

mod classification {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn release_at_100_ms_is_tap() {
        let (gesture, sent) = next_button(true, None);

        gesture.press();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(gesture.release(), GestureOutcome::Tap);

        // The cancelled hold timer must stay silent
        sleep(Duration::from_secs(1)).await;
        assert_eq!(*sent.lock(), vec!["NEXT".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn release_just_before_threshold_is_tap() {
        let (gesture, sent) = next_button(false, None);

        gesture.press();
        sleep(Duration::from_millis(299)).await;
        assert_eq!(gesture.release(), GestureOutcome::Tap);
        assert_eq!(*sent.lock(), vec!["NEXT".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn hold_is_sent_while_still_pressed() {
        let (gesture, sent) = next_button(false, None);

        gesture.press();
        sleep(Duration::from_millis(350)).await;
        assert!(gesture.is_pressed());
        assert_eq!(*sent.lock(), vec!["FASTFORWARD".to_string()]);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(gesture.release(), GestureOutcome::Hold);
        // Exactly one hold and no tap
        assert_eq!(*sent.lock(), vec!["FASTFORWARD".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn settle_is_sent_on_release_after_hold() {
        let (gesture, sent) = next_button(true, None);

        gesture.press();
        sleep(Duration::from_millis(800)).await;
        gesture.release();

        assert_eq!(
            *sent.lock(),
            vec!["FASTFORWARD".to_string(), "PLAY".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_gestures_are_independent() {
        let (gesture, sent) = next_button(true, None);

        gesture.press();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(gesture.release(), GestureOutcome::Hold);

        gesture.press();
        sleep(Duration::from_millis(50)).await;
        assert_eq!(gesture.release(), GestureOutcome::Tap);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(
            *sent.lock(),
            vec![
                "FASTFORWARD".to_string(),
                "PLAY".to_string(),
                "NEXT".to_string(),
            ]
        );
    }
}

// ============================================================================
// Events and teardown
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn outcomes_are_published() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let (gesture, _) = next_button(false, Some(bus));

        gesture.press();
        gesture.release();

        let events: Vec<ChannelEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert!(events.contains(&ChannelEvent::GestureResolved {
            channel: ChannelId::new("tv:transport"),
            outcome: GestureOutcome::Tap,
        }));
        assert_eq!(events.iter().filter(|e| e.is_command()).count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_discriminator_cancels_hold() {
        let (gesture, sent) = next_button(true, None);

        gesture.press();
        drop(gesture);
        sleep(Duration::from_secs(1)).await;

        assert!(sent.lock().is_empty());
    }
}
