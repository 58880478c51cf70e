// C ABI
// Opaque-handle interface for native host applications linking the static or dynamic library

use crate::detector::TouchDetector;

/// Create a detector using the embedded model. Free with [`touch_detector_free`].
#[no_mangle]
pub extern "C" fn touch_detector_new() -> *mut TouchDetector {
    Box::into_raw(Box::new(TouchDetector::new()))
}

/// Destroy a detector. Null is ignored.
///
/// # Safety
/// `detector` must be null or a pointer returned by [`touch_detector_new`]
/// that has not been freed.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_free(detector: *mut TouchDetector) {
    if !detector.is_null() {
        drop(Box::from_raw(detector));
    }
}

/// Append `count` samples. Null pointers and non-positive counts are a no-op.
///
/// # Safety
/// `detector` must be a live handle; `samples` must point to `count` readable i16 values.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_push_samples(
    detector: *mut TouchDetector,
    samples: *const i16,
    count: i32,
) {
    let Some(detector) = detector.as_mut() else {
        return;
    };
    if samples.is_null() || count <= 0 {
        return;
    }

    let block = std::slice::from_raw_parts(samples, count as usize);
    detector.push_samples(block);
}

/// Run a prediction if one is due. Non-positive sample rates return false.
///
/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_update(detector: *mut TouchDetector, sample_rate: i32) -> bool {
    match detector.as_mut() {
        Some(detector) if sample_rate > 0 => detector.update(sample_rate as u32),
        _ => false,
    }
}

/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_is_touch_detected(detector: *const TouchDetector) -> bool {
    detector.as_ref().is_some_and(|d| d.is_touch_detected())
}

/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_touch_probability(detector: *const TouchDetector) -> f32 {
    detector.as_ref().map_or(0.0, |d| d.touch_probability())
}

/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_is_model_loaded(detector: *const TouchDetector) -> bool {
    detector.as_ref().is_some_and(|d| d.is_model_loaded())
}

/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_has_enough_data(detector: *const TouchDetector) -> bool {
    detector.as_ref().is_some_and(|d| d.has_enough_data())
}

/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_is_enabled(detector: *const TouchDetector) -> bool {
    detector.as_ref().is_some_and(|d| d.is_enabled())
}

/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_set_enabled(detector: *mut TouchDetector, enabled: bool) {
    if let Some(detector) = detector.as_mut() {
        detector.set_enabled(enabled);
    }
}

/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_set_threshold(detector: *mut TouchDetector, threshold: f32) {
    if let Some(detector) = detector.as_mut() {
        detector.set_threshold(threshold);
    }
}

/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_get_threshold(detector: *const TouchDetector) -> f32 {
    detector.as_ref().map_or(0.0, |d| d.threshold())
}

/// # Safety
/// `detector` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn touch_detector_set_cooldown_seconds(detector: *mut TouchDetector, seconds: f32) {
    if let Some(detector) = detector.as_mut() {
        detector.set_cooldown_seconds(seconds);
    }
}
