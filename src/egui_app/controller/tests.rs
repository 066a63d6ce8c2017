use super::*;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::net::TcpListener;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn unreachable_endpoint() -> ServiceEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    ServiceEndpoint::new(&format!("http://{addr}")).unwrap()
}

fn controller() -> AppController {
    let surface = DrawingSurface::new(CanvasRaster::new(40, 40), Pen::default());
    AppController::new(unreachable_endpoint(), surface)
}

fn wait_for_jobs(controller: &mut AppController) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while controller.is_busy() {
        assert!(Instant::now() < deadline, "background job did not finish");
        std::thread::sleep(Duration::from_millis(5));
        controller.poll_jobs();
    }
}

fn draw_line(controller: &mut AppController) {
    controller.pointer_down(Point::new(5.0, 20.0));
    assert!(controller.pointer_move(Point::new(35.0, 20.0)));
    controller.pointer_up();
}

fn assert_pixel_near(controller: &AppController, expected: Rgba<u8>) {
    let actual = controller.surface().raster().pixel(20, 20).unwrap();
    for channel in 0..4 {
        let diff = (actual[channel] as i16 - expected[channel] as i16).abs();
        assert!(diff <= 1, "{actual:?} vs {expected:?}");
    }
}

fn png_upload(color: Rgba<u8>) -> ImageUpload {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(8, 8, color)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    ImageUpload::from_bytes("sample.png", "image/png", bytes).unwrap()
}

#[test]
fn drawing_marks_canvas_and_clear_resets_it() {
    let mut controller = controller();
    draw_line(&mut controller);
    assert!(!controller.surface().raster().is_blank());
    controller.clear_canvas();
    assert!(controller.surface().raster().is_blank());
    assert!(controller.ui.analyze.displayed.is_none());
}

#[test]
fn moving_without_pointer_down_draws_nothing() {
    let mut controller = controller();
    assert!(!controller.pointer_move(Point::new(10.0, 10.0)));
    assert!(controller.surface().raster().is_blank());
}

#[test]
fn network_failure_surfaces_fallback_and_reenables_trigger() {
    let mut controller = controller();
    draw_line(&mut controller);
    controller.submit_analysis();
    assert!(controller.is_analysis_submitting());
    wait_for_jobs(&mut controller);
    assert!(!controller.is_analysis_submitting());
    assert_eq!(
        controller.ui.analyze.error.as_deref(),
        Some(ANALYZE_FAILURE_MESSAGE)
    );
    assert!(controller.history().is_empty());
}

#[test]
fn second_trigger_while_submitting_is_ignored() {
    let mut controller = controller();
    controller.submit_analysis();
    controller.submit_analysis();
    wait_for_jobs(&mut controller);
    // Only one job was spawned, so no stray completion is pending.
    std::thread::sleep(Duration::from_millis(50));
    assert!(controller.jobs.try_recv_message().is_err());
}

#[test]
fn uploaded_image_replaces_canvas_content() {
    let mut controller = controller();
    controller.upload_image(png_upload(Rgba([0, 0, 0, 255])));
    assert_eq!(controller.ui.analyze.decoding.as_deref(), Some("sample.png"));
    wait_for_jobs(&mut controller);
    assert!(controller.ui.analyze.decoding.is_none());
    assert!(!controller.surface().raster().is_blank());
    assert_pixel_near(&controller, Rgba([0, 0, 0, 255]));
}

#[test]
fn only_latest_upload_is_applied() {
    let mut controller = controller();
    controller.upload_image(png_upload(Rgba([255, 0, 0, 255])));
    controller.upload_image(png_upload(Rgba([0, 0, 255, 255])));
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut received = 0;
    while received < 2 {
        assert!(Instant::now() < deadline, "decode jobs did not finish");
        if let Ok(JobMessage::UploadDecoded(message)) = controller.jobs.try_recv_message() {
            controller.handle_upload_decoded(message);
            received += 1;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    assert_pixel_near(&controller, Rgba([0, 0, 255, 255]));
}

#[test]
fn clearing_drops_pending_upload() {
    let mut controller = controller();
    controller.upload_image(png_upload(Rgba([0, 0, 0, 255])));
    controller.clear_canvas();
    assert!(!controller.is_busy());
    std::thread::sleep(Duration::from_millis(100));
    controller.poll_jobs();
    assert!(controller.surface().raster().is_blank());
}

#[test]
fn rejected_upload_leaves_canvas_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "not an image").unwrap();
    let mut controller = controller();
    draw_line(&mut controller);
    let before = controller.surface().raster().revision();
    controller.upload_image_from_path(&path);
    assert_eq!(
        controller.ui.analyze.upload_error.as_deref(),
        Some("Please upload a valid image.")
    );
    assert!(!controller.is_busy());
    assert_eq!(controller.surface().raster().revision(), before);
}

#[test]
fn corrupt_image_reports_error_after_decode() {
    let mut controller = controller();
    let upload = ImageUpload::from_bytes("broken.png", "image/png", b"garbage".to_vec()).unwrap();
    controller.upload_image(upload);
    wait_for_jobs(&mut controller);
    assert_eq!(
        controller.ui.analyze.upload_error.as_deref(),
        Some("Please upload a valid image.")
    );
    assert!(controller.surface().raster().is_blank());
}

#[test]
fn ocr_without_file_asks_for_one() {
    let mut controller = controller();
    controller.submit_ocr();
    assert_eq!(controller.ui.ocr.error.as_deref(), Some(OCR_NO_FILE_MESSAGE));
    assert!(!controller.is_ocr_submitting());
}

#[test]
fn ocr_network_failure_uses_ocr_fallback() {
    let mut controller = controller();
    controller.ui.ocr.selected = Some(png_upload(Rgba([0, 0, 0, 255])));
    controller.submit_ocr();
    assert!(controller.is_ocr_submitting());
    wait_for_jobs(&mut controller);
    assert_eq!(controller.ui.ocr.error.as_deref(), Some(OCR_FAILURE_MESSAGE));
    assert!(controller.ui.ocr.recognized_text.is_none());
}

#[test]
fn removing_out_of_range_history_entry_is_harmless() {
    let mut controller = controller();
    controller.remove_history_entry(3);
    assert!(controller.history().is_empty());
}

#[test]
fn set_view_switches_pages() {
    let mut controller = controller();
    assert_eq!(controller.view(), &View::Analyze);
    controller.set_view(View::Ocr);
    assert_eq!(controller.view(), &View::Ocr);
}

#[test]
fn from_settings_uses_configured_canvas() {
    let mut settings = AppSettings::default();
    settings.canvas.width = 64;
    settings.canvas.height = 48;
    let controller = AppController::from_settings(&settings).unwrap();
    assert_eq!(controller.surface().raster().width(), 64);
    assert_eq!(controller.surface().raster().height(), 48);
    assert_eq!(
        controller.endpoint().analyze_url(),
        "http://127.0.0.1:5000/analyze"
    );
}
