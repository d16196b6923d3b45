use std::collections::VecDeque;

use facetrack_rs::integration::face_ellipse_mask;
use facetrack_rs::tracker::FeatureCloud;
use facetrack_rs::{
    Config, FaceDetection, FaceDetectionBuilder, FaceDetector, GrayFrame, PointTracker,
    Recognition, RecognitionOracle, Rect, TemplateRecognizer, TrackState, TrackedPoints,
    TrackerConfig, TrackingCoordinator,
};
use nalgebra::Point2;
use ndarray::{Array2, ArrayView2};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Returns one scripted batch of detections per `detect` call, then nothing.
/// Seeds points on a small circle around the region center.
#[derive(Default)]
struct ScriptedDetector {
    script: VecDeque<Vec<FaceDetection>>,
    detect_calls: usize,
}

impl ScriptedDetector {
    fn new(script: Vec<Vec<FaceDetection>>) -> Self {
        Self {
            script: script.into(),
            detect_calls: 0,
        }
    }
}

impl FaceDetector for ScriptedDetector {
    type Error = std::convert::Infallible;

    fn detect(&mut self, _frame: &GrayFrame) -> Result<Vec<FaceDetection>, Self::Error> {
        self.detect_calls += 1;
        Ok(self.script.pop_front().unwrap_or_default())
    }

    fn extract_features(
        &mut self,
        _frame: &GrayFrame,
        region: &Rect,
        max_features: usize,
    ) -> Result<Vec<Point2<f32>>, Self::Error> {
        let (cx, cy) = region.center();
        let r = region.width.min(region.height) / 8.0;
        Ok((0..max_features)
            .map(|i| {
                let a = i as f32 * std::f32::consts::TAU / max_features as f32;
                Point2::new(cx + r * a.cos(), cy + r * a.sin())
            })
            .collect())
    }
}

/// Returns every point unchanged. Valid for the next `valid_calls` calls,
/// invalid afterwards.
struct ExpiringTracker {
    valid_calls: usize,
    calls: usize,
}

impl PointTracker for ExpiringTracker {
    type Error = std::convert::Infallible;

    fn track(
        &mut self,
        _prev: &GrayFrame,
        points: &[Point2<f32>],
        _next: &GrayFrame,
    ) -> Result<TrackedPoints, Self::Error> {
        self.calls += 1;
        let ok = self.valid_calls > 0;
        self.valid_calls = self.valid_calls.saturating_sub(1);
        Ok(TrackedPoints {
            points: points.to_vec(),
            valid: vec![ok; points.len()],
        })
    }
}

/// Records submissions; recognizes nothing unless told to.
#[derive(Default)]
struct RecordingOracle {
    submissions: Vec<String>,
    answer: Option<Recognition>,
}

impl RecognitionOracle for RecordingOracle {
    fn submit_sample(&mut self, _face: ArrayView2<'_, u8>, label: &str) -> bool {
        self.submissions.push(label.to_string());
        false
    }

    fn identify(&self, _face: ArrayView2<'_, u8>) -> Option<Recognition> {
        self.answer.clone()
    }
}

fn single_face(region: Rect) -> ScriptedDetector {
    ScriptedDetector::new(vec![vec![FaceDetection::new(region)]])
}

fn config(frames_between_detection: u64) -> TrackerConfig {
    TrackerConfig {
        frames_between_detection,
        ..Default::default()
    }
}

#[test]
fn test_tracking_then_lost() {
    init_logger();
    let detector = single_face(Rect::new(10.0, 10.0, 40.0, 40.0));
    // Frame 0 plus the five frames after it.
    let tracker = ExpiringTracker {
        valid_calls: 6,
        calls: 0,
    };
    let mut coordinator =
        TrackingCoordinator::new(detector, tracker, RecordingOracle::default(), config(50));
    let frame = GrayFrame::filled(100, 100, 128);

    for frame_id in 0..6 {
        let faces = coordinator.track(&frame);
        assert_eq!(faces.len(), 1, "frame {}", frame_id);
        assert_eq!(faces[0].label, "human1");
        assert_eq!(faces[0].state, TrackState::Tracking, "frame {}", frame_id);
    }
    let submitted_before_loss = coordinator.oracle().submissions.len();
    assert!(submitted_before_loss >= 1);
    assert!(coordinator.oracle().submissions.iter().all(|l| l == "human1"));

    for frame_id in 6..12 {
        let faces = coordinator.track(&frame);
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].state, TrackState::Lost, "frame {}", frame_id);
    }
    // Lost identities are not advanced and do not train.
    assert_eq!(coordinator.tracker().calls, 7);
    assert_eq!(coordinator.oracle().submissions.len(), submitted_before_loss);
    assert_eq!(coordinator.detector().detect_calls, 1);
}

#[test]
fn test_redetection_relocalizes_lost_identity() {
    init_logger();
    let detector = single_face(Rect::new(10.0, 10.0, 40.0, 40.0));
    let tracker = ExpiringTracker {
        valid_calls: 6,
        calls: 0,
    };
    let mut coordinator =
        TrackingCoordinator::new(detector, tracker, RecordingOracle::default(), config(10));
    let frame = GrayFrame::filled(100, 100, 128);

    for _ in 0..10 {
        coordinator.track(&frame);
    }
    let last_box = coordinator.identities()[0].bbox();
    assert_eq!(coordinator.identities()[0].state(), TrackState::Lost);
    assert!((last_box.x - 10.0).abs() < 1e-3 && (last_box.y - 10.0).abs() < 1e-3);
    assert_eq!((last_box.width, last_box.height), (40.0, 40.0));

    // Overlaps the last known box by a single pixel.
    let region = Rect::new(49.0, 49.0, 20.0, 20.0);
    coordinator.detector_mut().script.push_back(vec![FaceDetection::new(region)]);
    coordinator.tracker_mut().valid_calls = usize::MAX;

    let faces = coordinator.track(&frame);
    assert_eq!(faces.len(), 1);
    assert_eq!(faces[0].label, "human1");
    assert_eq!(faces[0].state, TrackState::Tracking);
    assert!((faces[0].bbox.x - 49.0).abs() < 1e-3);
    assert!((faces[0].bbox.y - 49.0).abs() < 1e-3);
}

#[test]
fn test_recognition_reassociates_moved_face() {
    init_logger();
    let detector = ScriptedDetector::new(vec![
        vec![
            FaceDetection::new(Rect::new(5.0, 5.0, 30.0, 30.0)),
            FaceDetection::new(Rect::new(60.0, 5.0, 30.0, 30.0)),
        ],
        // Second face reappears elsewhere, overlapping nobody.
        vec![FaceDetection::new(Rect::new(40.0, 60.0, 30.0, 30.0))],
    ]);
    let tracker = ExpiringTracker {
        valid_calls: usize::MAX,
        calls: 0,
    };
    let mut coordinator =
        TrackingCoordinator::new(detector, tracker, RecordingOracle::default(), config(5));
    let frame = GrayFrame::filled(100, 100, 128);

    let faces = coordinator.track(&frame);
    assert_eq!(faces.len(), 2);

    coordinator.oracle_mut().answer = Some(Recognition {
        label: "human2".to_string(),
        confidence: 0.8,
    });
    for _ in 0..5 {
        coordinator.track(&frame);
    }

    let faces = coordinator.track(&frame);
    assert_eq!(faces.len(), 2);
    assert_eq!(faces[1].label, "human2");
    assert!((faces[1].bbox.x - 40.0).abs() < 1e-3);
    assert!((faces[1].bbox.y - 60.0).abs() < 1e-3);
}

#[test]
fn test_zero_confidence_creates_new_identity() {
    let detector = ScriptedDetector::new(vec![
        vec![FaceDetection::new(Rect::new(5.0, 5.0, 30.0, 30.0))],
        vec![FaceDetection::new(Rect::new(60.0, 60.0, 30.0, 30.0))],
    ]);
    let tracker = ExpiringTracker {
        valid_calls: usize::MAX,
        calls: 0,
    };
    let oracle = RecordingOracle {
        answer: Some(Recognition {
            label: "human1".to_string(),
            confidence: 0.0,
        }),
        ..Default::default()
    };
    let mut coordinator = TrackingCoordinator::new(detector, tracker, oracle, config(2));
    let frame = GrayFrame::filled(100, 100, 128);

    coordinator.track(&frame);
    coordinator.track(&frame);
    let faces = coordinator.track(&frame);
    let labels: Vec<_> = faces.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, ["human1", "human2"]);
}

#[test]
fn test_lost_identity_evicted_then_resurrected() {
    init_logger();
    let detector = single_face(Rect::new(10.0, 10.0, 40.0, 40.0));
    let tracker = ExpiringTracker {
        valid_calls: 1,
        calls: 0,
    };
    let config = TrackerConfig {
        frames_between_detection: 20,
        lost_ttl_frames: Some(5),
        ..Default::default()
    };
    let mut coordinator =
        TrackingCoordinator::new(detector, tracker, RecordingOracle::default(), config);
    let frame = GrayFrame::filled(100, 100, 128);

    // Tracked on frame 0, lost on frame 1, gone once more than 5 frames passed.
    for _ in 0..6 {
        assert_eq!(coordinator.track(&frame).len(), 1);
    }
    assert!(coordinator.track(&frame).is_empty());

    // Recognized under its old label: comes back without a fresh name and
    // without retraining.
    coordinator.oracle_mut().answer = Some(Recognition {
        label: "human1".to_string(),
        confidence: 0.9,
    });
    coordinator
        .detector_mut()
        .script
        .push_back(vec![FaceDetection::new(Rect::new(30.0, 30.0, 40.0, 40.0))]);
    coordinator.tracker_mut().valid_calls = usize::MAX;
    let submitted = coordinator.oracle().submissions.len();

    let mut faces = Vec::new();
    for _ in 7..=20 {
        faces = coordinator.track(&frame);
    }
    assert_eq!(faces.len(), 1);
    assert_eq!(faces[0].label, "human1");
    assert_eq!(faces[0].state, TrackState::Tracking);
    assert!(coordinator.identities()[0].is_trained());
    assert_eq!(coordinator.oracle().submissions.len(), submitted);
}

#[test]
fn test_eviction_disabled_keeps_lost_identities() {
    let detector = single_face(Rect::new(10.0, 10.0, 40.0, 40.0));
    let tracker = ExpiringTracker {
        valid_calls: 0,
        calls: 0,
    };
    let config = TrackerConfig {
        frames_between_detection: 1000,
        lost_ttl_frames: None,
        ..Default::default()
    };
    let mut coordinator =
        TrackingCoordinator::new(detector, tracker, RecordingOracle::default(), config);
    let frame = GrayFrame::filled(100, 100, 128);

    for _ in 0..500 {
        coordinator.track(&frame);
    }
    assert_eq!(coordinator.identities().len(), 1);
    assert_eq!(coordinator.identities()[0].state(), TrackState::Lost);
}

#[test]
fn test_pose_from_detected_eyes() {
    let detection = FaceDetectionBuilder::new()
        .tlwh(260.0, 180.0, 120.0, 140.0)
        .eyes_in_face((60.0, 60.0), (92.0, 60.0))
        .build();
    let detector = ScriptedDetector::new(vec![vec![detection]]);
    let tracker = ExpiringTracker {
        valid_calls: usize::MAX,
        calls: 0,
    };
    let mut coordinator =
        TrackingCoordinator::with_default_config(detector, tracker, RecordingOracle::default());

    let faces = coordinator.track(&GrayFrame::filled(640, 480, 0));
    let pose = faces[0].pose;
    // Left eye at (320, 240), 32 px between the eyes at f = 500 px.
    assert!(pose[(0, 3)].abs() < 1e-9);
    assert!(pose[(1, 3)].abs() < 1e-9);
    assert!((pose[(2, 3)] - 1.0).abs() < 1e-9);
}

#[test]
fn test_template_recognizer_end_to_end() {
    init_logger();
    // A textured face on a flat background.
    let mut pixels = Array2::<u8>::from_elem((100, 100), 20);
    for r in 20..60 {
        for c in 20..60 {
            pixels[[r, c]] = ((r * 7 + c * 3) % 200) as u8 + 30;
        }
    }
    let frame = GrayFrame::from(pixels);
    let face = Rect::new(20.0, 20.0, 40.0, 40.0);

    let detector = ScriptedDetector::new(vec![vec![FaceDetection::new(face)]]);
    let tracker = ExpiringTracker {
        valid_calls: usize::MAX,
        calls: 0,
    };
    let mut coordinator =
        TrackingCoordinator::new(detector, tracker, TemplateRecognizer::default(), config(1000));

    for _ in 0..12 {
        coordinator.track(&frame);
    }
    assert!(coordinator.identities()[0].is_trained());
    assert!(coordinator.oracle().is_trained("human1"));

    let tracked = coordinator.identities()[0].bbox();
    let guess = coordinator.oracle().identify(frame.region(&tracked)).unwrap();
    assert_eq!(guess.label, "human1");
}

#[test]
fn test_mask_guides_seed_placement() {
    let region = Rect::new(10.0, 10.0, 40.0, 40.0);
    let mask = face_ellipse_mask(100, 100, &region, &Default::default());

    let frame = GrayFrame::filled(100, 100, 0);
    let mut detector = ScriptedDetector::default();
    let seeds = detector.extract_features(&frame, &region, 10).unwrap();
    for p in &seeds {
        assert!(mask[[p.y as usize, p.x as usize]]);
    }

    let mut cloud = FeatureCloud::new(10, 3.0);
    assert!(cloud.initialize(&frame, seeds));
    let centroid = cloud.centroid();
    assert!((centroid.x - 30.0).abs() < 1e-3);
    assert!((centroid.y - 30.0).abs() < 1e-3);
}

#[test]
fn test_coordinator_from_yaml_config() {
    let yaml = "tracking:\n  frames_between_detection: 4\n\
                pose:\n  focal_length: 1000.0\n\
                recognition:\n  max_training_images: 2\n";
    let config = Config::from_yaml(yaml).unwrap();
    config.validate().unwrap();

    let detection = FaceDetection::with_eyes(
        Rect::new(280.0, 200.0, 120.0, 120.0),
        Point2::new(320.0, 240.0),
        Point2::new(384.0, 240.0),
    );
    let detector = ScriptedDetector::new(vec![vec![detection]]);
    let tracker = ExpiringTracker {
        valid_calls: usize::MAX,
        calls: 0,
    };
    let oracle = TemplateRecognizer::new(config.recognition.clone());
    let mut coordinator = TrackingCoordinator::from_config(detector, tracker, oracle, &config);
    assert_eq!(coordinator.config().frames_between_detection, 4);

    let frame = GrayFrame::filled(640, 480, 90);
    let faces = coordinator.track(&frame);
    // Twice the focal length: twice the depth for the same pupil spacing.
    assert!((faces[0].pose[(2, 3)] - 1.0).abs() < 1e-9);

    coordinator.track(&frame);
    assert!(coordinator.identities()[0].is_trained());
    assert_eq!(coordinator.oracle().sample_count("human1"), 2);
}
