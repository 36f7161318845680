//! End-to-end locate scenarios against stub OCR sources.

use std::time::Duration;

use anyhow::anyhow;
use ocr_locator::{
    BoundingBox, EasyOcrDetection, EngineKind, FindOptions, LocatorConfig, OcrSource, PairOptions,
    Region, TesseractFrame, TextLocator, TextTarget, Token, TokenCapture,
};

/// A source that always recognizes the same tokens.
struct FixedSource {
    kind: EngineKind,
    capture: TokenCapture,
}

impl OcrSource for FixedSource {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    fn capture_tokens(&self, _region: Option<&Region>) -> anyhow::Result<TokenCapture> {
        Ok(self.capture.clone())
    }
}

/// A source whose engine is unavailable.
struct BrokenSource;

impl OcrSource for BrokenSource {
    fn kind(&self) -> EngineKind {
        EngineKind::Tesseract
    }

    fn capture_tokens(&self, _region: Option<&Region>) -> anyhow::Result<TokenCapture> {
        Err(anyhow!("recognition process exited"))
    }
}

fn menu_bar_source() -> Box<dyn OcrSource> {
    Box::new(FixedSource {
        kind: EngineKind::EasyOcr,
        capture: TokenCapture::unscaled(vec![
            Token::new("Finans", 0, 0, 60, 20, 92.0),
            Token::new("İzle", 70, 2, 40, 20, 88.0),
        ]),
    })
}

#[test]
fn locates_menu_entry_from_variant_list() {
    let locator = TextLocator::new(vec![menu_bar_source()]);
    let target = TextTarget::from(&["Finans - İzle", "Finans İzle"][..]);

    let result = locator
        .find_text(&target, None, &FindOptions::default())
        .unwrap()
        .expect("menu entry should match");

    assert_eq!(result.bbox, BoundingBox::new(0, 0, 110, 22));
    assert_eq!(result.engine, EngineKind::EasyOcr);
    assert_eq!(result.line_text, "Finans İzle");
}

#[test]
fn no_match_is_a_normal_outcome_even_after_a_backend_failure() {
    let locator = TextLocator::new(vec![Box::new(BrokenSource), menu_bar_source()]);

    let result = locator
        .find_text(&TextTarget::from("Tamam"), None, &FindOptions::default())
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn broken_engine_falls_through_to_the_next_one() {
    let locator = TextLocator::new(vec![Box::new(BrokenSource), menu_bar_source()]);

    let result = locator
        .find_text(
            &TextTarget::from("Finans İzle"),
            None,
            &FindOptions::default(),
        )
        .unwrap()
        .expect("second source should match");
    assert_eq!(result.engine, EngineKind::EasyOcr);
}

#[test]
fn tesseract_frame_flows_through_group_key_aggregation() {
    let frame = TesseractFrame {
        text: vec!["Banka".into(), "hesap".into(), "izleme".into()],
        left: vec![0, 50, 100],
        top: vec![0, 1, 0],
        width: vec![45, 45, 55],
        height: vec![18, 18, 18],
        conf: vec![91.0, 89.0, 87.0],
        page_num: vec![1, 1, 1],
        block_num: vec![1, 1, 1],
        par_num: vec![1, 1, 1],
        line_num: vec![3, 3, 3],
    };
    let source = Box::new(FixedSource {
        kind: EngineKind::Tesseract,
        capture: TokenCapture::unscaled(frame.into_tokens()),
    });
    let locator = TextLocator::new(vec![source]);

    let result = locator
        .find_text(
            &TextTarget::from("Banka hesap izleme"),
            None,
            &FindOptions::default(),
        )
        .unwrap()
        .expect("dropdown entry should match");
    assert_eq!(result.line_text, "Banka hesap izleme");
    assert_eq!(result.engine, EngineKind::Tesseract);
}

#[test]
fn easyocr_detections_map_back_through_region_and_scale() {
    // The capture collaborator upscaled the region 2x before recognition.
    let tokens = vec![EasyOcrDetection {
        quad: [(20.0, 20.0), (100.0, 20.0), (100.0, 60.0), (20.0, 60.0)],
        text: "Kaydet".into(),
        confidence: 0.95,
    }
    .into_token()];
    let source = Box::new(FixedSource {
        kind: EngineKind::EasyOcr,
        capture: TokenCapture::scaled(tokens, 2.0, 2.0),
    });
    let locator = TextLocator::new(vec![source]);
    let region = Region::new(100, 50, 800, 600);

    let result = locator
        .find_text(
            &TextTarget::from("Kaydet"),
            Some(&region),
            &FindOptions::default(),
        )
        .unwrap()
        .expect("button should match");
    assert_eq!(result.bbox, BoundingBox::new(110, 60, 40, 20));
}

#[test]
fn word_pair_lookup_respects_the_gap_budget() {
    let source = Box::new(FixedSource {
        kind: EngineKind::Tesseract,
        capture: TokenCapture::unscaled(vec![
            Token::new("Finans", 0, 0, 60, 20, 92.0),
            Token::new("İzle", 100, 2, 40, 20, 88.0),
        ]),
    });

    let locator = TextLocator::new(vec![source]);
    let bbox = locator
        .find_word_pair(None, "Finans", "İzle", &PairOptions::default())
        .unwrap()
        .expect("pair should be on one line");
    assert_eq!(bbox, BoundingBox::new(0, 0, 140, 22));

    let tight = PairOptions {
        max_gap_px: 50,
        ..PairOptions::default()
    };
    assert!(locator
        .find_word_pair(None, "Finans", "İzle", &tight)
        .unwrap()
        .is_none());
}

#[test]
fn wait_for_text_reports_timeout_as_false() {
    let mut config = LocatorConfig::default();
    config.poll_interval_ms = 5;
    let locator = TextLocator::with_config(vec![menu_bar_source()], config);

    let found = locator
        .wait_for_text(
            &TextTarget::from("Tamam"),
            Duration::from_millis(15),
            None,
            &FindOptions::default(),
        )
        .unwrap();
    assert!(!found);

    let found = locator
        .wait_for_text(
            &TextTarget::from("Finans İzle"),
            Duration::from_millis(15),
            None,
            &FindOptions::default(),
        )
        .unwrap();
    assert!(found);
}
