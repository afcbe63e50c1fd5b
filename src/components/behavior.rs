/// Per-player behaviors, run once per tick in priority order.
///
/// The set is closed: movement writes the motion context, and camera and
/// animation read the post-movement state of the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Movement,
    Camera,
    Animation,
}

impl Behavior {
    pub fn priority(self) -> i32 {
        match self {
            Self::Movement => 0,
            Self::Camera => 1,
            Self::Animation => 2,
        }
    }
}

/// Ordered list of behaviors owned by a player entity.
#[derive(Debug, Clone)]
pub struct PlayerBehaviors(Vec<Behavior>);

impl PlayerBehaviors {
    /// Sorts by priority; equal priorities keep registration order.
    pub fn new(mut behaviors: Vec<Behavior>) -> Self {
        behaviors.sort_by_key(|b| b.priority());
        Self(behaviors)
    }

    pub fn standard() -> Self {
        Self::new(vec![Behavior::Movement, Behavior::Camera, Behavior::Animation])
    }

    pub fn iter(&self) -> impl Iterator<Item = Behavior> + '_ {
        self.0.iter().copied()
    }
}
