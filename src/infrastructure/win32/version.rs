use windows::Win32::System::SystemInformation::{
    VerSetConditionMask, VerifyVersionInfoW, OSVERSIONINFOEXW, VER_MAJORVERSION,
    VER_MINORVERSION, VER_SERVICEPACKMAJOR,
};

const VER_GREATER_EQUAL: u8 = 3;

fn is_version_or_greater(major: u32, minor: u32, service_pack: u16) -> bool {
    let mut info = OSVERSIONINFOEXW {
        dwOSVersionInfoSize: std::mem::size_of::<OSVERSIONINFOEXW>() as u32,
        dwMajorVersion: major,
        dwMinorVersion: minor,
        wServicePackMajor: service_pack,
        ..Default::default()
    };
    unsafe {
        let mask = VerSetConditionMask(
            VerSetConditionMask(
                VerSetConditionMask(0, VER_MAJORVERSION, VER_GREATER_EQUAL),
                VER_MINORVERSION,
                VER_GREATER_EQUAL,
            ),
            VER_SERVICEPACKMAJOR,
            VER_GREATER_EQUAL,
        );
        VerifyVersionInfoW(
            &mut info,
            VER_MAJORVERSION | VER_MINORVERSION | VER_SERVICEPACKMAJOR,
            mask,
        )
        .is_ok()
    }
}

/// `Windows 10+`, `Windows 8`, `Windows 7`, or plain `Windows` for older hosts.
pub fn windows_version() -> String {
    let suffix = if is_version_or_greater(10, 0, 0) {
        " 10+"
    } else if is_version_or_greater(6, 2, 0) {
        " 8"
    } else if is_version_or_greater(6, 1, 0) {
        " 7"
    } else {
        ""
    };
    format!("Windows{}", suffix)
}
