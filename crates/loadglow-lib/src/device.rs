//! Keyboard backlight communication — trait + Linux backend.

use std::fmt;

use crate::led::RgbColor;
use crate::protocol::Mode;

// ── Error type ──

/// Device communication errors.
///
/// String payloads follow the convention **"context: details"** where *context*
/// identifies the step (e.g. `"USB open"`, `"SET_REPORT"`) and *details*
/// describes what went wrong.
#[derive(Debug)]
pub enum DeviceError {
    NotFound,
    OpenFailed(String),
    WriteFailed(String),
    /// A color write failed partway through a multi-zone dispatch.
    ZoneWrite { zone: Zone, reason: String },
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NotFound => write!(f, "MSI keyboard lighting device not found"),
            DeviceError::OpenFailed(e) => write!(f, "Failed to open device: {e}"),
            DeviceError::WriteFailed(e) => write!(f, "Write failed: {e}"),
            DeviceError::ZoneWrite { zone, reason } => {
                write!(f, "Color write to zone {zone} failed: {reason}")
            }
        }
    }
}

impl std::error::Error for DeviceError {}

pub type Result<T> = std::result::Result<T, DeviceError>;

// ── Zones ──

/// Independently addressable lighting region (1-based, as on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Zone(u8);

impl Zone {
    pub const LEFT: Zone = Zone(1);
    pub const MIDDLE: Zone = Zone(2);
    pub const RIGHT: Zone = Zone(3);

    /// Every zone the indicator drives, in dispatch order.
    pub const ALL: [Zone; 3] = [Zone::LEFT, Zone::MIDDLE, Zone::RIGHT];

    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Device info ──

#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Bus location, e.g. `usb:001/004`.
    pub path: String,
    /// USB product string, if the device reports one.
    pub product: String,
    pub serial: Option<String>,
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.product.is_empty() {
            write!(f, "{}", self.path)?;
        } else {
            write!(f, "{} at {}", self.product, self.path)?;
        }
        if let Some(serial) = &self.serial {
            write!(f, " (serial {serial})")?;
        }
        Ok(())
    }
}

// ── Trait ──

/// An open connection to the backlight controller.
///
/// Dropping the value closes the connection.
pub trait KeyboardDevice {
    fn open() -> Result<Self>
    where
        Self: Sized;
    fn info(&self) -> &DeviceInfo;
    fn set_mode(&self, mode: Mode) -> Result<()>;
    fn set_color(&self, color: RgbColor, zone: Zone) -> Result<()>;
}

// ── Linux implementation ──

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::time::Duration;

    use nusb::transfer::Control;
    use nusb::transfer::ControlType;
    use nusb::transfer::Recipient;

    use crate::protocol::{
        HID_SET_REPORT, LED_INTERFACE, MSI_LED_PID, MSI_LED_VID, SET_REPORT_VALUE,
        USB_TIMEOUT_MS, color_report, mode_report,
    };

    pub struct LinuxDevice {
        interface: nusb::Interface,
        info: DeviceInfo,
    }

    impl LinuxDevice {
        /// Send one feature report. Zero bytes accepted counts as a failure.
        fn send_report(&self, report: &[u8]) -> Result<()> {
            let control = Control {
                control_type: ControlType::Class,
                recipient: Recipient::Interface,
                request: HID_SET_REPORT,
                value: SET_REPORT_VALUE,
                index: u16::from(LED_INTERFACE),
            };
            let written = self
                .interface
                .control_out_blocking(control, report, Duration::from_millis(USB_TIMEOUT_MS))
                .map_err(|e| DeviceError::WriteFailed(format!("SET_REPORT: {e}")))?;
            if written == 0 {
                return Err(DeviceError::WriteFailed(
                    "SET_REPORT: device accepted 0 bytes".into(),
                ));
            }
            Ok(())
        }
    }

    impl KeyboardDevice for LinuxDevice {
        fn open() -> Result<Self> {
            let device_info = nusb::list_devices()
                .map_err(|e| DeviceError::OpenFailed(format!("USB enumeration: {e}")))?
                .find(|dev| dev.vendor_id() == MSI_LED_VID && dev.product_id() == MSI_LED_PID)
                .ok_or(DeviceError::NotFound)?;

            let serial = device_info.serial_number().map(|s| s.to_string());
            let product = device_info.product_string().unwrap_or_default().to_string();
            let path = format!(
                "usb:{:03}/{:03}",
                device_info.bus_number(),
                device_info.device_address()
            );

            let usb_device = device_info
                .open()
                .map_err(|e| DeviceError::OpenFailed(format!("USB open: {e}")))?;

            // usbhid owns the interface by default
            let interface = usb_device
                .detach_and_claim_interface(LED_INTERFACE)
                .map_err(|e| {
                    DeviceError::OpenFailed(format!("claim interface {LED_INTERFACE}: {e}"))
                })?;

            Ok(LinuxDevice {
                interface,
                info: DeviceInfo {
                    path,
                    product,
                    serial,
                },
            })
        }

        fn info(&self) -> &DeviceInfo {
            &self.info
        }

        fn set_mode(&self, mode: Mode) -> Result<()> {
            self.send_report(&mode_report(mode))
        }

        fn set_color(&self, color: RgbColor, zone: Zone) -> Result<()> {
            self.send_report(&color_report(zone, color))
        }
    }
}

#[cfg(target_os = "linux")]
pub use linux_impl::LinuxDevice;

// ── Stub device for unsupported platforms ──

/// Placeholder device that always returns `NotFound`.
/// Enables compilation and `cargo test` on unsupported hosts.
#[cfg(not(target_os = "linux"))]
pub struct StubDevice;

#[cfg(not(target_os = "linux"))]
impl KeyboardDevice for StubDevice {
    fn open() -> Result<Self> {
        Err(DeviceError::NotFound)
    }
    fn info(&self) -> &DeviceInfo {
        unreachable!()
    }
    fn set_mode(&self, _mode: Mode) -> Result<()> {
        unreachable!()
    }
    fn set_color(&self, _color: RgbColor, _zone: Zone) -> Result<()> {
        unreachable!()
    }
}

/// Concrete device type for the current platform.
#[cfg(target_os = "linux")]
pub type PlatformDevice = LinuxDevice;
#[cfg(not(target_os = "linux"))]
pub type PlatformDevice = StubDevice;

/// Open the platform-appropriate backlight device.
pub fn open_device() -> Result<PlatformDevice> {
    PlatformDevice::open()
}

// ── Mock device for testing ──

/// In-memory mock device for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Record of everything done to one or more mock handles.
    ///
    /// Shared through `Rc` so a test can follow writes across reconnects.
    #[derive(Debug, Default)]
    pub struct MockJournal {
        /// Successful color writes, in order.
        pub writes: RefCell<Vec<(Zone, RgbColor)>>,
        /// Successful mode changes, in order.
        pub modes: RefCell<Vec<Mode>>,
        /// Number of handles dropped.
        pub closes: Cell<u32>,
        /// If true, color writes fail on every handle sharing this journal.
        pub unplugged: Cell<bool>,
    }

    impl MockJournal {
        pub fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        /// Zones written so far, in order.
        pub fn zones(&self) -> Vec<Zone> {
            self.writes.borrow().iter().map(|(z, _)| *z).collect()
        }

        /// Colors written so far, one entry per zone write.
        pub fn colors(&self) -> Vec<RgbColor> {
            self.writes.borrow().iter().map(|(_, c)| *c).collect()
        }
    }

    pub struct MockDevice {
        info: DeviceInfo,
        pub journal: Rc<MockJournal>,
        /// If set, `set_color` fails for this zone.
        pub fail_zone: Cell<Option<Zone>>,
        /// If true, `set_mode` returns an error.
        pub fail_set_mode: Cell<bool>,
    }

    impl Default for MockDevice {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockDevice {
        pub fn new() -> Self {
            Self::with_journal(MockJournal::new())
        }

        pub fn with_journal(journal: Rc<MockJournal>) -> Self {
            MockDevice {
                info: DeviceInfo {
                    path: "mock://msi-keyboard".into(),
                    product: "MSI EPF USB".into(),
                    serial: Some("MOCK123".into()),
                },
                journal,
                fail_zone: Cell::new(None),
                fail_set_mode: Cell::new(false),
            }
        }

        /// A handle whose writes to `zone` always fail.
        pub fn failing_on(journal: Rc<MockJournal>, zone: Zone) -> Self {
            let dev = Self::with_journal(journal);
            dev.fail_zone.set(Some(zone));
            dev
        }
    }

    impl Drop for MockDevice {
        fn drop(&mut self) {
            self.journal.closes.set(self.journal.closes.get() + 1);
        }
    }

    impl KeyboardDevice for MockDevice {
        fn open() -> Result<Self> {
            Ok(Self::new())
        }

        fn info(&self) -> &DeviceInfo {
            &self.info
        }

        fn set_mode(&self, mode: Mode) -> Result<()> {
            if self.fail_set_mode.get() {
                return Err(DeviceError::WriteFailed(
                    "mock: set_mode failure injected".into(),
                ));
            }
            self.journal.modes.borrow_mut().push(mode);
            Ok(())
        }

        fn set_color(&self, color: RgbColor, zone: Zone) -> Result<()> {
            if self.journal.unplugged.get() {
                return Err(DeviceError::WriteFailed("mock: device unplugged".into()));
            }
            if self.fail_zone.get() == Some(zone) {
                return Err(DeviceError::WriteFailed(
                    "mock: set_color failure injected".into(),
                ));
            }
            self.journal.writes.borrow_mut().push((zone, color));
            Ok(())
        }
    }
}
