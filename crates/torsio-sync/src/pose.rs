//! Pose tracker seam.

use glam::Mat4;

use crate::slot::Mailbox;

/// Camera description for one tracked frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose {
    pub view: Mat4,
    pub projection: Mat4,
    /// Camera-to-world transform.
    pub transform: Mat4,
}

impl Pose {
    pub fn new(view: Mat4, projection: Mat4, transform: Mat4) -> Self {
        Self {
            view,
            projection,
            transform,
        }
    }

    pub const IDENTITY: Self = Self {
        view: Mat4::IDENTITY,
        projection: Mat4::IDENTITY,
        transform: Mat4::IDENTITY,
    };
}

/// Producer of poses, polled once per refresh on the render thread.
pub trait PoseSource {
    /// Whether the tracker currently has a fix. While `false`, no poses are
    /// expected and the last committed camera stays in effect.
    fn tracking_available(&self) -> bool {
        true
    }

    /// New pose since the previous poll, if any. Must not block.
    fn next_pose(&mut self) -> Option<Pose>;
}

/// Mailbox-backed source for trackers that run on their own thread:
/// the tracker posts, the render loop polls.
pub type PoseMailbox = Mailbox<Pose>;

impl PoseSource for PoseMailbox {
    fn next_pose(&mut self) -> Option<Pose> {
        self.try_take()
    }
}

/// Polls `source`, honouring its tracking gate.
pub fn poll_pose<S: PoseSource + ?Sized>(source: &mut S) -> Option<Pose> {
    if !source.tracking_available() {
        return None;
    }
    source.next_pose()
}
