//! Frame coordinator.
//!
//! Owns the engine and drives it once per display refresh:
//!
//! ```text
//! resize (if any) -> update_camera (if a new pose) -> update_world (once) -> encode (once)
//! ```
//!
//! Host-side values (glam matrices, `f64` acceleration, the shared parameter)
//! are converted to the engine's flat `f32` arrays on the way through.
//! Every boundary call happens on the thread that owns the coordinator.

mod config;
mod error;
mod stage;

pub use config::CoordinatorConfig;
pub use error::CoordinatorError;
pub use stage::{FrameOp, FrameStage};

use glam::{DVec2, Mat4};

use crate::boundary::{EngineBoundary, PixelFormat};
use crate::camera::CameraState;
use crate::coords::{Bounds, SurfaceSize};
use crate::marshal::narrow_vec3;
use crate::param::ParameterStore;
use crate::pose::Pose;
use crate::sensor::MotionSample;
use crate::slot::LatestReader;
use crate::touch::{TouchEvent, TouchPhase};

/// Summary of one completed refresh.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameReport {
    /// Index of the refresh, starting at 0.
    pub frame_index: u64,
    /// A new pose was committed this refresh.
    pub camera_updated: bool,
    /// The engine encoded draw commands (false when no encoder was available).
    pub drawn: bool,
}

pub struct FrameCoordinator<E: EngineBoundary> {
    engine: E,
    config: CoordinatorConfig,

    pixel_format: Option<PixelFormat>,
    stage: FrameStage,
    frame_index: u64,

    camera: CameraState,
    surface: SurfaceSize,
    /// A resize arrived before pipeline creation and has not reached the engine.
    surface_pending: bool,

    params: ParameterStore,
    motion: LatestReader<MotionSample>,
}

impl<E: EngineBoundary> FrameCoordinator<E> {
    /// Takes ownership of `engine` for the coordinator's lifetime.
    ///
    /// `params` is the store the UI writes to; `motion` reads the sensor
    /// sampler's published acceleration.
    pub fn new(
        engine: E,
        params: ParameterStore,
        motion: LatestReader<MotionSample>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            engine,
            config,
            pixel_format: None,
            stage: FrameStage::Idle,
            frame_index: 0,
            camera: CameraState::default(),
            surface: SurfaceSize::default(),
            surface_pending: false,
            params,
            motion,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Format the pipeline was created for, once it has been.
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        self.pixel_format
    }

    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    /// Number of refreshes completed so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Last committed camera (after correction).
    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    // ── setup ────────────────────────────────────────────────────────────

    /// Creates engine pipeline state for `format`. Exactly once, before any
    /// frame operation.
    pub fn create_pipeline_states(&mut self, format: PixelFormat) -> Result<(), CoordinatorError> {
        if let Some(active) = self.pixel_format {
            return Err(CoordinatorError::PipelineAlreadyCreated { active });
        }

        if let Err(e) = self.engine.create_pipeline_states(format) {
            log::error!("pipeline creation failed: {e}");
            return Err(e.into());
        }
        self.pixel_format = Some(format);
        log::info!("pipeline state created for {format}");

        if self.surface_pending {
            self.engine
                .update_screen_sizes(self.surface.width, self.surface.height)?;
            self.surface_pending = false;
        }
        Ok(())
    }

    /// Replaces the stored surface size and tells the engine.
    ///
    /// Allowed at any time. Before pipeline creation the size is only stored
    /// and forwarded once the pipeline exists.
    pub fn update_surface(&mut self, size: SurfaceSize) -> Result<(), CoordinatorError> {
        if size != self.surface {
            log::info!("surface resized to {}x{}", size.width, size.height);
        }
        self.surface = size;

        if self.pixel_format.is_none() {
            self.surface_pending = true;
            return Ok(());
        }

        self.engine.update_screen_sizes(size.width, size.height)?;
        Ok(())
    }

    // ── per frame ────────────────────────────────────────────────────────

    /// Sends a new camera to the engine and commits it once the engine has
    /// accepted it.
    ///
    /// The configured coordinate correction is composed with `view` first.
    pub fn update_camera(
        &mut self,
        view: Mat4,
        projection: Mat4,
        transform: Mat4,
    ) -> Result<(), CoordinatorError> {
        let next = self.check(FrameOp::UpdateCamera)?;

        let camera = CameraState {
            view: self.config.correction.apply(view),
            projection,
            transform,
        };

        let (view, projection, transform) = camera.flattened();
        self.engine
            .set_camera_matrices(&view, &projection, &transform)?;

        self.camera = camera;
        self.stage = next;
        Ok(())
    }

    /// Advances the engine's simulation with the freshest acceleration and
    /// parameter value.
    pub fn update_world(&mut self) -> Result<(), CoordinatorError> {
        let next = self.check(FrameOp::UpdateWorld)?;

        let accel = narrow_vec3(self.motion.read().to_dvec3());
        let strength = self.params.get();
        log::trace!(
            "frame {}: world accel={accel:?} strength={strength}",
            self.frame_index
        );

        self.engine.update_world(&accel, strength)?;

        self.stage = next;
        Ok(())
    }

    /// Lets the engine record draw commands into `encoder`.
    ///
    /// The caller owns the encoder: it is begun before this call and ended
    /// after it, whatever this returns.
    pub fn encode(&mut self, encoder: &mut E::Encoder<'_>) -> Result<(), CoordinatorError> {
        let next = self.check(FrameOp::Encode)?;

        self.engine.encode(encoder)?;

        self.finish_frame(next);
        Ok(())
    }

    /// Closes a refresh whose draw step was skipped.
    pub fn end_frame(&mut self) -> Result<(), CoordinatorError> {
        let next = self.check(FrameOp::EndFrame)?;
        self.finish_frame(next);
        Ok(())
    }

    /// Runs one full refresh.
    ///
    /// `encoder` is `None` when the host could not obtain one this refresh
    /// (surface not ready); the world still advances but nothing is drawn,
    /// and no retry happens until the next refresh.
    pub fn run_frame(
        &mut self,
        resize: Option<SurfaceSize>,
        pose: Option<Pose>,
        encoder: Option<&mut E::Encoder<'_>>,
    ) -> Result<FrameReport, CoordinatorError> {
        let frame_index = self.frame_index;

        if let Some(size) = resize {
            self.update_surface(size)?;
        }

        let camera_updated = match pose {
            Some(pose) => {
                self.update_camera(pose.view, pose.projection, pose.transform)?;
                true
            }
            None => false,
        };

        self.update_world()?;

        let drawn = match encoder {
            Some(encoder) => {
                self.encode(encoder)?;
                true
            }
            None => {
                log::debug!("frame {frame_index}: no encoder available, skipping draw");
                self.end_frame()?;
                false
            }
        };

        Ok(FrameReport {
            frame_index,
            camera_updated,
            drawn,
        })
    }

    // ── touches ──────────────────────────────────────────────────────────

    pub fn touches_began(&self, location: DVec2, bounds: Bounds) {
        self.observe_touch(TouchEvent::new(TouchPhase::Began, location, bounds));
    }

    pub fn touches_moved(&self, location: DVec2, bounds: Bounds) {
        self.observe_touch(TouchEvent::new(TouchPhase::Moved, location, bounds));
    }

    pub fn touches_ended(&self, location: DVec2, bounds: Bounds) {
        self.observe_touch(TouchEvent::new(TouchPhase::Ended, location, bounds));
    }

    /// Touches are observed only; they never change coordinator state.
    pub fn observe_touch(&self, touch: TouchEvent) {
        log::debug!(
            "touch {} at ({:.1}, {:.1}) in {:.0}x{:.0} view",
            touch.phase,
            touch.location.x,
            touch.location.y,
            touch.bounds.size.x,
            touch.bounds.size.y,
        );
    }

    // ── internals ────────────────────────────────────────────────────────

    fn check(&self, op: FrameOp) -> Result<FrameStage, CoordinatorError> {
        if self.pixel_format.is_none() {
            return Err(CoordinatorError::PipelineNotReady { op });
        }
        self.stage.after(op).ok_or(CoordinatorError::OutOfOrder {
            op,
            stage: self.stage,
        })
    }

    fn finish_frame(&mut self, next: FrameStage) {
        self.stage = next;
        self.frame_index = self.frame_index.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::recording::{BoundaryCall, RecordingEncoder, RecordingEngine};
    use crate::boundary::BoundaryError;
    use crate::camera::{CoordinateCorrection, CorrectionOrder};
    use crate::marshal::flatten_row_major;
    use crate::slot::LatestCell;
    use glam::{Vec3, Vec4};

    struct Rig {
        coordinator: FrameCoordinator<RecordingEngine>,
        params: ParameterStore,
        motion: LatestCell<MotionSample>,
    }

    fn rig_with(engine: RecordingEngine, config: CoordinatorConfig) -> Rig {
        let params = ParameterStore::default();
        let motion = LatestCell::new(MotionSample::ZERO);
        let coordinator = FrameCoordinator::new(engine, params.clone(), motion.reader(), config);
        Rig {
            coordinator,
            params,
            motion,
        }
    }

    fn rig() -> Rig {
        rig_with(RecordingEngine::new(), CoordinatorConfig::default())
    }

    fn ready() -> Rig {
        let mut rig = rig();
        rig.coordinator
            .create_pipeline_states(PixelFormat::Bgra8Unorm)
            .unwrap();
        rig
    }

    fn sample_pose(seed: f32) -> Pose {
        let eye = Vec3::new(seed, 1.5, 3.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(1.0, 4.0 / 3.0, 0.01, 100.0);
        Pose::new(view, projection, view.inverse())
    }

    // ── setup ────────────────────────────────────────────────────────────

    #[test]
    fn frame_ops_before_pipeline_are_rejected() {
        let mut rig = rig();
        let c = &mut rig.coordinator;

        assert_eq!(
            c.update_camera(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY),
            Err(CoordinatorError::PipelineNotReady { op: FrameOp::UpdateCamera })
        );
        assert_eq!(
            c.update_world(),
            Err(CoordinatorError::PipelineNotReady { op: FrameOp::UpdateWorld })
        );
        assert_eq!(
            c.encode(&mut RecordingEncoder::default()),
            Err(CoordinatorError::PipelineNotReady { op: FrameOp::Encode })
        );
        assert!(c.engine().calls.is_empty());
    }

    #[test]
    fn unsupported_format_is_a_hard_error() {
        let mut rig = rig_with(
            RecordingEngine::rejecting(PixelFormat::Rgba16Float),
            CoordinatorConfig::default(),
        );
        let c = &mut rig.coordinator;

        let err = c.create_pipeline_states(PixelFormat::Rgba16Float).unwrap_err();
        assert_eq!(
            err,
            CoordinatorError::Boundary(BoundaryError::UnsupportedPixelFormat(
                PixelFormat::Rgba16Float
            ))
        );
        assert_eq!(c.pixel_format(), None);
        assert!(c.update_world().is_err());
    }

    #[test]
    fn pipeline_is_created_once() {
        let mut rig = ready();
        assert_eq!(
            rig.coordinator.create_pipeline_states(PixelFormat::Rgba8Unorm),
            Err(CoordinatorError::PipelineAlreadyCreated {
                active: PixelFormat::Bgra8Unorm
            })
        );
    }

    #[test]
    fn resize_before_pipeline_is_forwarded_on_creation() {
        let mut rig = rig();
        let c = &mut rig.coordinator;

        c.update_surface(SurfaceSize::new(800.0, 600.0)).unwrap();
        assert!(c.engine().calls.is_empty());

        c.create_pipeline_states(PixelFormat::Bgra8Unorm).unwrap();
        assert_eq!(
            c.engine().calls,
            vec![
                BoundaryCall::CreatePipelineStates(PixelFormat::Bgra8Unorm),
                BoundaryCall::UpdateScreenSizes(800.0, 600.0),
            ]
        );
    }

    // ── surface ──────────────────────────────────────────────────────────

    #[test]
    fn surface_is_last_writer_wins() {
        let mut rig = ready();
        let sizes = [(320.0, 240.0), (1024.0, 768.0), (0.0, 0.0), (640.0, 480.0)];
        for (w, h) in sizes {
            rig.coordinator.update_surface(SurfaceSize::new(w, h)).unwrap();
        }
        assert_eq!(rig.coordinator.surface(), SurfaceSize::new(640.0, 480.0));
        assert_eq!(
            rig.coordinator.engine().calls.last(),
            Some(&BoundaryCall::UpdateScreenSizes(640.0, 480.0))
        );
    }

    // ── camera ───────────────────────────────────────────────────────────

    #[test]
    fn camera_crosses_boundary_row_major() {
        let mut rig = ready();
        let view = Mat4::from_cols(
            Vec4::new(1.0, 2.0, 3.0, 4.0),
            Vec4::new(5.0, 6.0, 7.0, 8.0),
            Vec4::new(9.0, 10.0, 11.0, 12.0),
            Vec4::new(13.0, 14.0, 15.0, 16.0),
        );
        let pose = sample_pose(0.5);

        rig.coordinator
            .update_camera(view, pose.projection, pose.transform)
            .unwrap();

        let (v, p, t) = rig.coordinator.engine().last_camera().unwrap();
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(v[row * 4 + col], view.row(row)[col]);
                assert_eq!(p[row * 4 + col], pose.projection.row(row)[col]);
                assert_eq!(t[row * 4 + col], pose.transform.row(row)[col]);
            }
        }
    }

    #[test]
    fn correction_is_composed_with_view() {
        let correction = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let pose = sample_pose(1.0);

        for order in [CorrectionOrder::PostMultiply, CorrectionOrder::PreMultiply] {
            let config = CoordinatorConfig::default()
                .with_correction(CoordinateCorrection::new(correction, order));
            let mut rig = rig_with(RecordingEngine::new(), config);
            let c = &mut rig.coordinator;
            c.create_pipeline_states(PixelFormat::Bgra8Unorm).unwrap();
            c.update_camera(pose.view, pose.projection, pose.transform)
                .unwrap();

            let expected = match order {
                CorrectionOrder::PostMultiply => pose.view * correction,
                CorrectionOrder::PreMultiply => correction * pose.view,
            };
            assert_eq!(c.camera().view, expected);
            assert_eq!(c.engine().last_camera().unwrap().0, flatten_row_major(&expected));
        }
    }

    #[test]
    fn world_only_frames_keep_last_committed_camera() {
        let mut rig = ready();
        let pose = sample_pose(2.0);
        let mut enc = RecordingEncoder::default();

        rig.coordinator.run_frame(None, Some(pose), Some(&mut enc)).unwrap();
        let committed = *rig.coordinator.camera();
        assert_ne!(committed, CameraState::default());

        let report = rig.coordinator.run_frame(None, None, Some(&mut enc)).unwrap();
        assert!(!report.camera_updated);
        assert_eq!(*rig.coordinator.camera(), committed);
        // The engine was told about the camera once; it keeps using it.
        assert_eq!(rig.coordinator.engine().camera_calls().len(), 1);
        assert_eq!(
            rig.coordinator.engine().last_camera(),
            Some(committed.flattened())
        );
    }

    #[test]
    fn consecutive_frames_without_pose_see_identical_camera() {
        let mut rig = ready();
        let mut enc = RecordingEncoder::default();
        rig.coordinator
            .run_frame(None, Some(sample_pose(3.0)), Some(&mut enc))
            .unwrap();

        let first = *rig.coordinator.camera();
        rig.coordinator.run_frame(None, None, Some(&mut enc)).unwrap();
        let second = *rig.coordinator.camera();
        rig.coordinator.run_frame(None, None, Some(&mut enc)).unwrap();

        assert_eq!(first, second);
        assert_eq!(second, *rig.coordinator.camera());
    }

    // ── world ────────────────────────────────────────────────────────────

    #[test]
    fn scenario_bgra8_world_update() {
        let mut rig = rig();
        let format: PixelFormat = "BGRA8".parse().unwrap();
        let c = &mut rig.coordinator;

        c.create_pipeline_states(format).unwrap();
        c.update_surface(SurfaceSize::new(1024.0, 768.0)).unwrap();
        c.update_camera(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY)
            .unwrap();

        rig.params.set(0.5);
        rig.motion.publish(MotionSample::new(0.1, 0.2, -9.8));
        c.update_world().unwrap();

        assert_eq!(
            c.engine().world_calls(),
            vec![([0.1f32, 0.2f32, -9.8f32], 0.5f32)]
        );
    }

    #[test]
    fn out_of_range_parameter_is_clamped_before_world_update() {
        let mut rig = ready();
        let mut enc = RecordingEncoder::default();

        rig.params.set(4.0);
        rig.coordinator.run_frame(None, None, Some(&mut enc)).unwrap();
        rig.params.set(-1.0);
        rig.coordinator.run_frame(None, None, Some(&mut enc)).unwrap();

        let strengths: Vec<f32> = rig
            .coordinator
            .engine()
            .world_calls()
            .into_iter()
            .map(|(_, s)| s)
            .collect();
        assert_eq!(strengths, vec![1.0, 0.0]);
    }

    #[test]
    fn degraded_sensor_sends_zero_acceleration() {
        let sampler = crate::sensor::SensorSampler::disabled();
        let params = ParameterStore::default();
        let mut c = FrameCoordinator::new(
            RecordingEngine::new(),
            params,
            sampler.reader(),
            CoordinatorConfig::default(),
        );
        c.create_pipeline_states(PixelFormat::Bgra8Unorm).unwrap();

        let mut enc = RecordingEncoder::default();
        for _ in 0..3 {
            c.run_frame(None, Some(sample_pose(0.0)), Some(&mut enc)).unwrap();
        }
        assert!(c
            .engine()
            .world_calls()
            .iter()
            .all(|(accel, _)| *accel == [0.0, 0.0, 0.0]));
    }

    #[test]
    fn world_update_at_most_once_per_frame() {
        let mut rig = ready();
        rig.coordinator.update_world().unwrap();
        assert_eq!(
            rig.coordinator.update_world(),
            Err(CoordinatorError::OutOfOrder {
                op: FrameOp::UpdateWorld,
                stage: FrameStage::WorldUpdated
            })
        );
        assert_eq!(rig.coordinator.engine().world_calls().len(), 1);
    }

    #[test]
    fn camera_after_world_is_rejected() {
        let mut rig = ready();
        rig.coordinator.update_world().unwrap();
        let err = rig
            .coordinator
            .update_camera(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, CoordinatorError::OutOfOrder { op: FrameOp::UpdateCamera, .. }));
        assert!(rig.coordinator.engine().camera_calls().is_empty());
    }

    #[test]
    fn boundary_failure_propagates() {
        let mut engine = RecordingEngine::new();
        engine.fail_update_world = Some("simulation diverged");
        let mut rig = rig_with(engine, CoordinatorConfig::default());
        rig.coordinator
            .create_pipeline_states(PixelFormat::Bgra8Unorm)
            .unwrap();

        let err = rig.coordinator.update_world().unwrap_err();
        assert_eq!(
            err,
            CoordinatorError::Boundary(BoundaryError::engine("update_world", "simulation diverged"))
        );
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(rig.coordinator.stage(), FrameStage::Idle);
    }

    #[test]
    fn rejected_camera_is_not_committed() {
        let mut engine = RecordingEngine::new();
        engine.fail_set_camera = Some("matrix upload failed");
        let mut rig = rig_with(engine, CoordinatorConfig::default());
        rig.coordinator
            .create_pipeline_states(PixelFormat::Bgra8Unorm)
            .unwrap();

        let pose = sample_pose(4.0);
        let err = rig
            .coordinator
            .update_camera(pose.view, pose.projection, pose.transform)
            .unwrap_err();
        assert_eq!(
            err,
            CoordinatorError::Boundary(BoundaryError::engine(
                "set_camera_matrices",
                "matrix upload failed"
            ))
        );
        assert_eq!(*rig.coordinator.camera(), CameraState::default());
        assert_eq!(rig.coordinator.stage(), FrameStage::Idle);

        // The retry goes through and is what gets committed.
        rig.coordinator
            .update_camera(pose.view, pose.projection, pose.transform)
            .unwrap();
        let committed = *rig.coordinator.camera();
        assert_ne!(committed, CameraState::default());
        assert_eq!(
            rig.coordinator.engine().last_camera(),
            Some(committed.flattened())
        );
    }

    // ── encode / frame sequence ──────────────────────────────────────────

    #[test]
    fn encode_requires_world_update() {
        let mut rig = ready();
        let mut enc = RecordingEncoder::default();
        assert_eq!(
            rig.coordinator.encode(&mut enc),
            Err(CoordinatorError::OutOfOrder {
                op: FrameOp::Encode,
                stage: FrameStage::Idle
            })
        );
        assert_eq!(enc.draws, 0);
    }

    #[test]
    fn run_frame_orders_boundary_calls() {
        let mut rig = ready();
        let mut enc = RecordingEncoder::default();
        let pose = sample_pose(1.0);

        let report = rig
            .coordinator
            .run_frame(Some(SurfaceSize::new(1024.0, 768.0)), Some(pose), Some(&mut enc))
            .unwrap();

        assert_eq!(
            report,
            FrameReport {
                frame_index: 0,
                camera_updated: true,
                drawn: true
            }
        );
        assert_eq!(enc.draws, 1);

        let kinds: Vec<&'static str> = rig.coordinator.engine().calls[1..]
            .iter()
            .map(|c| match c {
                BoundaryCall::CreatePipelineStates(_) => "pipeline",
                BoundaryCall::UpdateScreenSizes(..) => "resize",
                BoundaryCall::SetCameraMatrices { .. } => "camera",
                BoundaryCall::UpdateWorld { .. } => "world",
                BoundaryCall::Encode => "encode",
            })
            .collect();
        assert_eq!(kinds, vec!["resize", "camera", "world", "encode"]);
        assert_eq!(rig.coordinator.stage(), FrameStage::Idle);
        assert_eq!(rig.coordinator.frame_index(), 1);
    }

    #[test]
    fn missing_encoder_skips_draw_but_advances_world() {
        let mut rig = ready();
        let report = rig.coordinator.run_frame(None, None, None).unwrap();

        assert!(!report.drawn);
        assert_eq!(rig.coordinator.engine().world_calls().len(), 1);
        assert!(!rig.coordinator.engine().calls.contains(&BoundaryCall::Encode));

        // Next refresh proceeds normally.
        let mut enc = RecordingEncoder::default();
        let report = rig.coordinator.run_frame(None, None, Some(&mut enc)).unwrap();
        assert_eq!(report.frame_index, 1);
        assert!(report.drawn);
    }

    // ── touches ──────────────────────────────────────────────────────────

    #[test]
    fn touches_do_not_mutate_state() {
        let rig = ready();
        let bounds = Bounds::new(0.0, 0.0, 390.0, 844.0);
        let before = rig.coordinator.engine().calls.len();

        rig.coordinator.touches_began(DVec2::new(10.0, 20.0), bounds);
        rig.coordinator.touches_moved(DVec2::new(f64::NAN, 1e300), bounds);
        rig.coordinator.touches_ended(DVec2::new(-5.0, 900.0), Bounds::default());

        assert_eq!(rig.coordinator.engine().calls.len(), before);
        assert_eq!(rig.coordinator.stage(), FrameStage::Idle);
    }
}
