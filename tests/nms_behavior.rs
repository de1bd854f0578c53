use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use yolo_region::lowlevel::suppress;
use yolo_region::{iou, BBox, Detection, NmsConfig, NmsMode, RegionError};

fn det(class_id: usize, confidence: f32, bbox: BBox) -> Detection {
    Detection::new(class_id, format!("class{class_id}"), confidence, bbox)
}

fn random_detections(rng: &mut StdRng, count: usize) -> Vec<Detection> {
    (0..count)
        .map(|_| {
            let x = rng.random_range(0..400);
            let y = rng.random_range(0..400);
            let w = rng.random_range(10..120);
            let h = rng.random_range(10..120);
            det(
                rng.random_range(0..3),
                rng.random_range(0.05f32..1.0),
                BBox::new(x, y, x + w, y + h),
            )
        })
        .collect()
}

#[test]
fn heavy_overlap_keeps_only_the_stronger_box() {
    // 100x100 boxes shifted by 5 px: overlap 9500 / union 10500 ~= 0.905.
    let strong = det(0, 0.8, BBox::new(0, 0, 100, 100));
    let weak = det(0, 0.6, BBox::new(5, 0, 105, 100));
    assert!(iou(&strong.bbox(), &weak.bbox()) > 0.9);

    let kept = suppress(vec![weak, strong.clone()], &NmsConfig::new(0.5)).unwrap();
    assert_eq!(kept, vec![strong]);
}

#[test]
fn light_overlap_keeps_both_boxes() {
    // Shift by 67 px: overlap 3300 / union 16700 ~= 0.198.
    let a = det(0, 0.3, BBox::new(0, 0, 100, 100));
    let b = det(0, 0.95, BBox::new(67, 0, 167, 100));
    let value = iou(&a.bbox(), &b.bbox());
    assert!(value > 0.19 && value < 0.21);

    for mode in [NmsMode::Greedy, NmsMode::Legacy] {
        let cfg = NmsConfig {
            mode,
            ..NmsConfig::new(0.5)
        };
        assert_eq!(suppress(vec![a.clone(), b.clone()], &cfg).unwrap().len(), 2);
    }
}

#[test]
fn overlap_equal_to_threshold_suppresses() {
    let a = det(0, 0.9, BBox::new(0, 0, 10, 10));
    let b = det(0, 0.5, BBox::new(0, 0, 10, 10));
    let kept = suppress(vec![a, b], &NmsConfig::new(1.0)).unwrap();
    assert_eq!(kept.len(), 1);
}

#[test]
fn survivors_are_sorted_by_descending_confidence() {
    let mut rng = StdRng::seed_from_u64(21);
    let kept = suppress(random_detections(&mut rng, 200), &NmsConfig::new(0.45)).unwrap();
    assert!(!kept.is_empty());
    for pair in kept.windows(2) {
        assert!(pair[0].confidence() >= pair[1].confidence());
    }
}

#[test]
fn survivors_do_not_overlap_each_other() {
    let mut rng = StdRng::seed_from_u64(22);
    let cfg = NmsConfig::new(0.45);
    let kept = suppress(random_detections(&mut rng, 300), &cfg).unwrap();
    for (i, a) in kept.iter().enumerate() {
        for b in kept.iter().skip(i + 1) {
            assert!(iou(&a.bbox(), &b.bbox()) < cfg.iou_threshold);
        }
    }
}

#[test]
fn suppression_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(23);
    for class_agnostic in [true, false] {
        let cfg = NmsConfig {
            class_agnostic,
            ..NmsConfig::new(0.4)
        };
        let once = suppress(random_detections(&mut rng, 250), &cfg).unwrap();
        let twice = suppress(once.clone(), &cfg).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn zero_confidence_and_degenerate_inputs_are_handled() {
    let kept = suppress(
        vec![
            det(0, 0.0, BBox::new(0, 0, 10, 10)),
            det(0, 0.7, BBox::new(5, 5, 5, 50)),
            det(0, 0.6, BBox::new(0, 0, 10, 10)),
        ],
        &NmsConfig::new(0.3),
    )
    .unwrap();
    let confs: Vec<f32> = kept.iter().map(|d| d.confidence()).collect();
    assert_eq!(confs, vec![0.7, 0.6]);
}

#[test]
fn empty_input_gives_empty_output() {
    assert!(suppress(Vec::new(), &NmsConfig::default())
        .unwrap()
        .is_empty());
}

#[test]
fn out_of_range_iou_threshold_is_rejected() {
    let boxes = vec![
        det(0, 0.9, BBox::new(0, 0, 100, 100)),
        det(0, 0.8, BBox::new(5, 0, 105, 100)),
    ];
    for threshold in [f32::NAN, -0.1, 1.5, f32::INFINITY] {
        let err = suppress(boxes.clone(), &NmsConfig::new(threshold)).unwrap_err();
        assert_eq!(
            err,
            RegionError::InvalidInput("iou_threshold must be in [0, 1]")
        );
    }
    assert_eq!(suppress(boxes, &NmsConfig::new(0.5)).unwrap().len(), 1);
}
