//! End-to-end flows: PNG in, packed frame out, uploaded over HTTP.

mod common;

use common::{fixtures, MockDevice};
use eink_quantize::{Algorithm, Background, Rotation};
use inkframe::error::{InputRejected, PipelineError, TransportError};
use inkframe::rendering::{decode_png, encode_frame_png, encode_packed_png};
use inkframe::server::build_router;
use inkframe::services::{
    choose, crop_and_compare, Command, CropOptions, HttpTransport, PanelStore, PipelineController,
    PipelineEvent, PipelineState,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn controller_for(url: &str) -> PipelineController {
    let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();
    PipelineController::new(Arc::new(transport))
}

/// Start the simulator on a free port and return its base URL
async fn start_simulator() -> (String, Arc<PanelStore>) {
    let store = Arc::new(PanelStore::new());
    let app = build_router(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    (format!("http://127.0.0.1:{port}"), store)
}

#[tokio::test]
async fn test_photo_to_mock_frame() {
    let device = MockDevice::start().await;
    device.respond_with_status(200).await;

    let mut controller = controller_for(&device.upload_url());
    let mut events = controller.subscribe();

    let source = decode_png(&fixtures::gradient_png(300, 200)).unwrap();
    crop_and_compare(&mut controller, source, &CropOptions::default())
        .await
        .unwrap();
    assert_eq!(controller.comparison().len(), Algorithm::ALL.len());

    choose(&mut controller, Algorithm::Atkinson).await.unwrap();
    controller.dispatch(Command::Upload).await.unwrap();
    assert_eq!(controller.state(), PipelineState::Done(Algorithm::Atkinson));

    let bodies = device.upload_bodies().await;
    assert_eq!(bodies.len(), 1);
    let packed = controller.packed().unwrap().as_bytes();
    assert!(bodies[0].windows(packed.len()).any(|w| w == packed));

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    assert!(received.contains(&PipelineEvent::Processing));
    assert!(received.contains(&PipelineEvent::UploadProgress(100)));
    assert_eq!(received.last(), Some(&PipelineEvent::UploadSucceeded));
}

#[tokio::test]
async fn test_failed_upload_retries_same_buffer() {
    let device = MockDevice::start().await;
    device.fail_once_then_accept(503).await;

    let mut controller = controller_for(&device.upload_url());
    let source = decode_png(&fixtures::solid_png(60, 80, [255, 140, 0])).unwrap();
    crop_and_compare(&mut controller, source, &CropOptions::default())
        .await
        .unwrap();
    choose(&mut controller, Algorithm::FloydSteinberg)
        .await
        .unwrap();

    let err = controller.dispatch(Command::Upload).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Transport(TransportError::Status(503))
    ));
    assert_eq!(
        controller.state(),
        PipelineState::Failed(Algorithm::FloydSteinberg)
    );
    assert!(controller.packed().is_some());

    controller.dispatch(Command::Upload).await.unwrap();
    assert_eq!(
        controller.state(),
        PipelineState::Done(Algorithm::FloydSteinberg)
    );

    let bodies = device.upload_bodies().await;
    assert_eq!(bodies.len(), 2);
    let packed = controller.packed().unwrap().as_bytes();
    for body in &bodies {
        assert!(body.windows(packed.len()).any(|w| w == packed));
    }
}

#[tokio::test]
async fn test_photo_to_simulator() {
    let (base, store) = start_simulator().await;
    let mut controller = controller_for(&format!("{base}/upload"));

    let source = decode_png(&fixtures::solid_png(448, 600, [0, 255, 0])).unwrap();
    crop_and_compare(&mut controller, source, &CropOptions::default())
        .await
        .unwrap();
    choose(&mut controller, Algorithm::NoDither).await.unwrap();
    controller.dispatch(Command::Upload).await.unwrap();

    let image = store.latest().await.expect("simulator stored the frame");
    assert_eq!(&image.packed, controller.packed().unwrap());
    // Pure green is palette index 2
    assert!(image.packed.as_bytes().iter().all(|&b| b == 0x22));
}

#[tokio::test]
async fn test_rotated_black_background_flow() {
    let (base, store) = start_simulator().await;
    let mut controller = controller_for(&format!("{base}/upload"));

    let source = decode_png(&fixtures::solid_png(40, 30, [255, 255, 255])).unwrap();
    let options = CropOptions {
        rotation: Rotation::Deg90,
        zoom_percent: Some(100),
        background: Some(Background::Black),
        ..Default::default()
    };
    crop_and_compare(&mut controller, source, &options)
        .await
        .unwrap();
    assert_eq!(controller.transform().rotation(), Rotation::Deg90);
    assert_eq!(controller.transform().background(), Background::Black);

    choose(&mut controller, Algorithm::NoDither).await.unwrap();
    controller.dispatch(Command::Upload).await.unwrap();

    // A 40x30 photo at 100% leaves the corners black
    let image = store.latest().await.unwrap();
    assert_eq!(image.packed.as_bytes()[0], 0x00);
}

#[tokio::test]
async fn test_rejections_leave_state_alone() {
    let mut controller = controller_for("http://127.0.0.1:9/upload");

    let err = decode_png(b"not a png").unwrap_err();
    assert!(matches!(err, InputRejected::NotAnImage(_)));
    assert_eq!(controller.state(), PipelineState::Idle);

    let err = controller.dispatch(Command::ConfirmCrop).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InputRejected(InputRejected::UnexpectedCommand { .. })
    ));
    assert_eq!(controller.state(), PipelineState::Idle);
}

#[tokio::test]
async fn test_load_new_image_after_done() {
    let device = MockDevice::start().await;
    device.respond_with_status(200).await;

    let mut controller = controller_for(&device.upload_url());
    let source = decode_png(&fixtures::gradient_png(64, 64)).unwrap();
    crop_and_compare(&mut controller, source, &CropOptions::default())
        .await
        .unwrap();
    choose(&mut controller, Algorithm::OrderedBayer).await.unwrap();
    controller.dispatch(Command::Upload).await.unwrap();

    controller.dispatch(Command::LoadNewImage).await.unwrap();
    assert_eq!(controller.state(), PipelineState::Idle);
    assert!(controller.packed().is_none());

    // A second photo goes through the same controller
    let source = decode_png(&fixtures::solid_png(10, 10, [0, 0, 0])).unwrap();
    crop_and_compare(&mut controller, source, &CropOptions::default())
        .await
        .unwrap();
    assert_eq!(controller.state(), PipelineState::Comparing);
}

#[tokio::test]
async fn test_previews_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut controller = controller_for("http://127.0.0.1:9/upload");

    let source = decode_png(&fixtures::gradient_png(120, 90)).unwrap();
    crop_and_compare(&mut controller, source, &CropOptions::default())
        .await
        .unwrap();

    for frame in controller.comparison() {
        let path = dir.path().join(format!("{}.png", frame.algorithm().slug()));
        std::fs::write(&path, encode_frame_png(frame).unwrap()).unwrap();
    }
    let mut names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "atkinson.png",
            "black-and-white.png",
            "floyd-steinberg.png",
            "none.png",
            "ordered.png",
        ]
    );

    choose(&mut controller, Algorithm::BlackAndWhite).await.unwrap();
    let packed_path = dir.path().join("frame.bin");
    std::fs::write(&packed_path, controller.packed().unwrap().as_bytes()).unwrap();
    assert_eq!(
        std::fs::metadata(&packed_path).unwrap().len(),
        fixtures::packed_len() as u64
    );

    let png = encode_packed_png(controller.packed().unwrap()).unwrap();
    assert_eq!(&png[..4], b"\x89PNG");
}
