use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// capi:export
pub fn Add(a: i32, b: i32) -> Result<i32, String> {
    a.checked_add(b).ok_or_else(|| "overflow".to_string())
}

/// capi:export
pub fn Ping(code: i32) -> Result<(), String> {
    if code == 0 {
        Ok(())
    } else {
        Err(format!("ping failed: {}", code))
    }
}

/// capi:export
pub fn Explode(code: i32) -> Result<(), String> {
    std::panic::panic_any(code)
}

/// capi:export
pub fn Reset(export_channel: i32) -> Result<(), String> {
    if export_channel < 0 {
        return Err("negative".to_string());
    }
    Ok(())
}

/// capi:export
pub fn Mix(guarded_call: i32, c_string: i64) -> Result<i64, String> {
    Ok(i64::from(guarded_call) + c_string)
}

/// capi:export
pub struct CloudSave {
    pub DeviceID: String,
    pub Timestamp: SystemTime,
    pub VectorClock: HashMap<String, i64>,
    pub Active: bool,
    pub Score: f64,
}

pub fn sample_save() -> CloudSave {
    let mut clock = HashMap::new();
    clock.insert("b".to_string(), 2);
    clock.insert("a".to_string(), 1);
    CloudSave {
        DeviceID: "deck-01".to_string(),
        Timestamp: UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        VectorClock: clock,
        Active: true,
        Score: 0.5,
    }
}
