// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-session arena of bound channels.
//!
//! A [`Session`] owns everything that belongs to one active control surface:
//! the channel controllers, the command scheduler, the gesture
//! discriminators and the event bus. Ending the session (or dropping it)
//! cancels every armed timer, so nothing is sent for a surface that is gone.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use chanctl::codec::ValueCodec;
//! use chanctl::descriptor::ValueDescriptor;
//! use chanctl::session::Session;
//! use chanctl::sink::ChannelSink;
//! use chanctl::types::{ChannelId, DomainValue};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> chanctl::Result<()> {
//! let (sink, mut outbound) = ChannelSink::new();
//! let session = Session::new(Arc::new(sink));
//! let dimmer = ChannelId::new("lamp:dimmer");
//!
//! session.bind(dimmer.clone(), ValueCodec::Number, ValueDescriptor::new().with_bounds(0.0, 100.0));
//! session.apply_wire(&dimmer, "20")?;
//!
//! session.submit(&dimmer, DomainValue::numeric(35.0))?;
//! session.submit(&dimmer, DomainValue::numeric(60.0))?;
//! assert_eq!(session.display(&dimmer).as_deref(), Some("60"));
//!
//! assert_eq!(outbound.recv().await.unwrap().payload, "60");
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{broadcast, watch};

use crate::binding::ChannelBinding;
use crate::codec::{InboundCommand, ValueCodec};
use crate::config::SessionConfig;
use crate::controller::ChannelController;
use crate::descriptor::ValueDescriptor;
use crate::error::{Error, Result};
use crate::event::{ChannelEvent, EventBus};
use crate::gesture::{GestureActions, GestureDiscriminator, GestureOutcome};
use crate::scheduler::CommandScheduler;
use crate::sink::CommandSink;
use crate::types::{ChannelId, DomainValue};

/// Channels, timers and events of one control surface.
pub struct Session {
    config: SessionConfig,
    sink: Arc<dyn CommandSink>,
    events: EventBus,
    scheduler: CommandScheduler,
    controllers: RwLock<HashMap<ChannelId, Arc<ChannelController>>>,
    gestures: RwLock<HashMap<ChannelId, Arc<GestureDiscriminator>>>,
}

impl Session {
    /// Creates a session with the default configuration.
    #[must_use]
    pub fn new(sink: Arc<dyn CommandSink>) -> Self {
        Self::with_config(sink, SessionConfig::default())
    }

    /// Creates a session with a custom configuration.
    #[must_use]
    pub fn with_config(sink: Arc<dyn CommandSink>, config: SessionConfig) -> Self {
        let events = EventBus::with_capacity(config.event_capacity);
        let scheduler = CommandScheduler::builder(Arc::clone(&sink))
            .window(config.timing.debounce_window)
            .events(events.clone())
            .build();
        Self {
            config,
            sink,
            events,
            scheduler,
            controllers: RwLock::new(HashMap::new()),
            gestures: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Subscribes to the events of every channel in this session.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.events.subscribe()
    }

    /// Binds a channel, replacing any previous binding with the same id.
    ///
    /// A replaced channel loses its pending command and gesture.
    pub fn bind(
        &self,
        id: impl Into<ChannelId>,
        codec: ValueCodec,
        descriptor: ValueDescriptor,
    ) -> ChannelBinding {
        let binding = ChannelBinding::new(id, codec, descriptor);
        let id = binding.id().clone();

        let replaced = self
            .controllers
            .write()
            .insert(id.clone(), Arc::new(ChannelController::new(binding.clone())))
            .is_some();
        if replaced {
            self.scheduler.cancel(&id);
            self.gestures.write().remove(&id);
            tracing::debug!(channel = %id, "Replaced channel binding");
        } else {
            tracing::debug!(channel = %id, kind = binding.kind().as_str(), "Bound channel");
        }
        binding
    }

    /// Attaches tap/hold handling to a bound channel.
    ///
    /// Every action must be a value the channel accepts, so gestures are
    /// held to the same rules as [`submit`](Self::submit).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelNotBound`] if the channel is not bound and
    /// [`Error::Value`] if an action does not fit the channel.
    pub fn bind_gesture(&self, id: &ChannelId, actions: GestureActions) -> Result<()> {
        let binding = self.controller(id)?.binding().clone();
        for action in actions.values() {
            binding.check(action).inspect_err(|e| {
                tracing::warn!(channel = %id, error = %e, "Refused gesture action");
            })?;
        }
        let gesture = GestureDiscriminator::with_options(
            binding,
            actions,
            Arc::clone(&self.sink),
            self.config.timing.hold_threshold,
            Some(self.events.clone()),
        );
        self.gestures.write().insert(id.clone(), Arc::new(gesture));
        Ok(())
    }

    /// Removes a channel, dropping its pending command and gesture.
    ///
    /// Returns true if the channel was bound.
    pub fn unbind(&self, id: &ChannelId) -> bool {
        let removed = self.controllers.write().remove(id).is_some();
        self.scheduler.cancel(id);
        self.gestures.write().remove(id);
        if removed {
            tracing::debug!(channel = %id, "Unbound channel");
        }
        removed
    }

    /// Returns the ids of all bound channels.
    #[must_use]
    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.controllers.read().keys().cloned().collect()
    }

    /// Returns the binding of a channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelNotBound`] if the channel is not bound.
    pub fn binding(&self, id: &ChannelId) -> Result<ChannelBinding> {
        Ok(self.controller(id)?.binding().clone())
    }

    /// Returns the current display string of a channel.
    #[must_use]
    pub fn display(&self, id: &ChannelId) -> Option<String> {
        self.controllers.read().get(id).map(|c| c.display())
    }

    /// Returns the last good value of a channel.
    #[must_use]
    pub fn value(&self, id: &ChannelId) -> Option<DomainValue> {
        self.controllers.read().get(id).and_then(|c| c.value())
    }

    /// Watches the display string of a channel.
    #[must_use]
    pub fn watch_display(&self, id: &ChannelId) -> Option<watch::Receiver<String>> {
        self.controllers.read().get(id).map(|c| c.watch_display())
    }

    /// Applies a value reported by the device.
    ///
    /// Returns true if the display changed. A value that fails to decode is
    /// reported as a [`ChannelEvent::DecodeRejected`] event and leaves the
    /// channel untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelNotBound`] for unknown channels and
    /// [`Error::Decode`] for rejected values.
    pub fn apply_wire(&self, id: &ChannelId, wire: &str) -> Result<bool> {
        let controller = self.controller(id)?;
        match controller.apply_wire(wire) {
            Ok(changed) => {
                if changed {
                    self.display_changed(&controller);
                }
                Ok(changed)
            }
            Err(error) => {
                self.events.publish(ChannelEvent::DecodeRejected {
                    channel: id.clone(),
                    wire: wire.to_string(),
                    error: error.clone(),
                });
                Err(error.into())
            }
        }
    }

    /// Submits a value chosen by the user.
    ///
    /// The display is updated right away; the command follows when the
    /// debounce window closes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelNotBound`] for unknown channels and
    /// [`Error::Value`] if the descriptor rejects the value.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn submit(&self, id: &ChannelId, value: DomainValue) -> Result<()> {
        let controller = self.controller(id)?;
        if controller.apply_local(value.clone())? {
            self.display_changed(&controller);
        }
        self.scheduler.submit(controller.binding(), value);
        Ok(())
    }

    /// Converts a control-surface command and submits the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the channel cannot represent the
    /// command, plus everything [`submit`](Self::submit) returns.
    pub fn command(&self, id: &ChannelId, command: &InboundCommand) -> Result<()> {
        let value = self.controller(id)?.binding().accept(command)?;
        self.submit(id, value)
    }

    /// Sends the pending value of a channel immediately.
    ///
    /// Returns true if a value was pending.
    pub fn flush(&self, id: &ChannelId) -> bool {
        self.scheduler.flush(id)
    }

    /// Returns the number of channels with a pending command.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Starts a gesture on a channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelNotBound`] if the channel has no gesture
    /// handling attached.
    pub fn press(&self, id: &ChannelId) -> Result<bool> {
        Ok(self.gesture(id)?.press())
    }

    /// Ends a gesture on a channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelNotBound`] if the channel has no gesture
    /// handling attached.
    pub fn release(&self, id: &ChannelId) -> Result<GestureOutcome> {
        Ok(self.gesture(id)?.release())
    }

    /// Tears the session down.
    ///
    /// Every pending command is dropped, every running gesture abandoned and
    /// every channel unbound. Event subscribers stay connected.
    pub fn end(&self) {
        self.scheduler.shutdown();
        let gestures: Vec<_> = self.gestures.write().drain().map(|(_, g)| g).collect();
        for gesture in &gestures {
            gesture.reset();
        }
        let channels = {
            let mut controllers = self.controllers.write();
            let count = controllers.len();
            controllers.clear();
            count
        };
        if channels > 0 {
            tracing::debug!(channels, "Session ended");
        }
    }

    fn controller(&self, id: &ChannelId) -> Result<Arc<ChannelController>> {
        self.controllers
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ChannelNotBound(id.clone()))
    }

    fn gesture(&self, id: &ChannelId) -> Result<Arc<GestureDiscriminator>> {
        self.gestures
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ChannelNotBound(id.clone()))
    }

    fn display_changed(&self, controller: &ChannelController) {
        self.events.publish(ChannelEvent::DisplayChanged {
            channel: controller.binding().id().clone(),
            display: controller.display(),
        });
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.end();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("channels", &self.controllers.read().len())
            .field("gestures", &self.gestures.read().len())
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
