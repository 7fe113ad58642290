mod exports;
mod internal;

use std::ffi::{c_void, CStr};
use std::os::raw::c_char;

fn take_string(ptr: *const c_char) -> String {
    let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    unsafe { exports::capi_free(ptr as *mut c_void) };
    text
}

fn last_error() -> String {
    take_string(exports::capi_last_error_json())
}

fn main() {
    std::panic::set_hook(Box::new(|_| {}));

    let mut sum = 0;
    let status = unsafe { exports::PM_Add(2, 3, &mut sum) };
    println!("add {} {} {}", status, sum, last_error());

    let status = unsafe { exports::PM_Add(i32::MAX, 1, std::ptr::null_mut()) };
    println!("overflow {} {}", status, last_error());

    println!("panic {} {}", exports::PM_Explode(7), last_error());
    println!("ping {} {}", exports::PM_Ping(0), last_error());
    println!("ping {} {}", exports::PM_Ping(4), last_error());
    println!("reset {} {}", exports::PM_Reset(-1), last_error());

    let mut mixed = 0;
    let status = unsafe { exports::PM_Mix(2, 40, &mut mixed) };
    println!("mix {} {}", status, mixed);

    let mirror = exports::CloudSave::from(&internal::sample_save());
    println!(
        "save {} {} {} {} {}",
        take_string(mirror.DeviceID),
        mirror.TimestampUnix,
        take_string(mirror.VectorClockJSON),
        mirror.Active,
        mirror.Score
    );
}
