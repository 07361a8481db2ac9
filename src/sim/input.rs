//! Control sampling and edge detection
//!
//! The host hands the session a [`ControlState`] every frame. The tracker
//! diffs it against the previous sample so edge-triggered actions (jump, the
//! first key that starts a run) fire once per transition, not once per frame.

/// One bindable control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    Leftward,
    Rightward,
    Jump,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Forward,
        Control::Backward,
        Control::Leftward,
        Control::Rightward,
        Control::Jump,
    ];
}

/// Held state of every control for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    pub forward: bool,
    pub backward: bool,
    pub leftward: bool,
    pub rightward: bool,
    pub jump: bool,
}

impl ControlState {
    pub fn get(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.forward,
            Control::Backward => self.backward,
            Control::Leftward => self.leftward,
            Control::Rightward => self.rightward,
            Control::Jump => self.jump,
        }
    }

    pub fn set(&mut self, control: Control, pressed: bool) {
        match control {
            Control::Forward => self.forward = pressed,
            Control::Backward => self.backward = pressed,
            Control::Leftward => self.leftward = pressed,
            Control::Rightward => self.rightward = pressed,
            Control::Jump => self.jump = pressed,
        }
    }

    pub fn with(mut self, control: Control) -> Self {
        self.set(control, true);
        self
    }

    pub fn any(&self) -> bool {
        Control::ALL.iter().any(|c| self.get(*c))
    }
}

/// What changed between two samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A control was pressed or released
    Changed { control: Control, pressed: bool },
    /// Jump went from released to pressed
    JumpPressed,
}

/// Diffs successive samples into events
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    previous: ControlState,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> ControlState {
        self.previous
    }

    /// Record `current` and return the events since the last sample
    pub fn sample(&mut self, current: ControlState) -> Vec<InputEvent> {
        let mut events = Vec::new();
        for control in Control::ALL {
            let pressed = current.get(control);
            if pressed != self.previous.get(control) {
                events.push(InputEvent::Changed { control, pressed });
                if control == Control::Jump && pressed {
                    events.push(InputEvent::JumpPressed);
                }
            }
        }
        self.previous = current;
        events
    }

    /// Forget held state, e.g. when a session is rebuilt
    pub fn reset(&mut self) {
        self.previous = ControlState::default();
    }
}

/// Handle returned by [`Subscriptions::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Callback<E> = Box<dyn FnMut(&E)>;

/// Owned list of observer callbacks, released together on teardown
pub struct Subscriptions<E> {
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
    next_id: u32,
}

impl<E> Default for Subscriptions<E> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> std::fmt::Debug for Subscriptions<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriptions")
            .field("len", &self.callbacks.len())
            .finish()
    }
}

impl<E> Subscriptions<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was already released
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(i, _)| *i != id);
        self.callbacks.len() != before
    }

    pub fn notify(&mut self, event: &E) {
        for (_, callback) in &mut self.callbacks {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Release every callback
    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}
