use std::ops::Deref;
use windows::core::{Error, Interface};
use windows::Win32::Foundation::{E_INVALIDARG, E_OUTOFMEMORY};

use kiln_gfx::backend::DeviceError;

/// Interface wrapper asserting cross-thread use is safe. The D3D11 device is
/// free-threaded; the immediate context is not and is never stored behind
/// this wrapper.
pub(crate) struct SendableIUnknown<T: Interface>(pub T);

impl<T: Interface> From<T> for SendableIUnknown<T> {
    fn from(object: T) -> Self {
        Self(object)
    }
}

unsafe impl<T: Interface> Send for SendableIUnknown<T> {}
unsafe impl<T: Interface> Sync for SendableIUnknown<T> {}

impl<T: Interface> Deref for SendableIUnknown<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub(crate) fn device_error_from_hresult(error: Error) -> DeviceError {
    match error.code() {
        E_OUTOFMEMORY => DeviceError::OutOfMemory,
        E_INVALIDARG => DeviceError::InvalidParameters,
        _ => DeviceError::Unknown,
    }
}
