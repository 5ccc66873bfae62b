use std::sync::Arc;
use windows::Win32::Foundation::HINSTANCE;
use windows::Win32::Graphics::Direct3D::{D3D_DRIVER_TYPE_HARDWARE, D3D_FEATURE_LEVEL_11_0};
use windows::Win32::Graphics::Direct3D11::{
    D3D11CreateDevice, ID3D11Device, D3D11_CREATE_DEVICE_DEBUG, D3D11_CREATE_DEVICE_FLAG,
    D3D11_SDK_VERSION,
};

use crate::device::D3D11Device;
use kiln_core::kiln_info;
use kiln_gfx::backend::{Backend, BackendError, Device};

#[cfg(debug_assertions)]
const ENABLE_DEBUG_LAYER: bool = true;

#[cfg(not(debug_assertions))]
const ENABLE_DEBUG_LAYER: bool = false;

pub struct D3D11Backend;

impl D3D11Backend {
    pub fn new() -> Arc<D3D11Backend> {
        Arc::new(D3D11Backend)
    }
}

impl Backend for D3D11Backend {
    fn create_device(&self) -> Result<Arc<dyn Device>, BackendError> {
        let mut flags = D3D11_CREATE_DEVICE_FLAG(0);
        if ENABLE_DEBUG_LAYER {
            flags |= D3D11_CREATE_DEVICE_DEBUG;
            kiln_info!("Using D3D11 debug layer");
        }

        let feature_levels = [D3D_FEATURE_LEVEL_11_0];
        let mut device: Option<ID3D11Device> = None;
        let result = unsafe {
            D3D11CreateDevice(
                None,
                D3D_DRIVER_TYPE_HARDWARE,
                HINSTANCE(0),
                flags,
                Some(&feature_levels),
                D3D11_SDK_VERSION,
                Some(&mut device),
                None,
                None,
            )
        };

        match result {
            Ok(()) => match device {
                Some(device) => Ok(Arc::new(D3D11Device::new(device))),
                None => Err(BackendError::Unsupported),
            },
            Err(_) => Err(BackendError::Unsupported),
        }
    }
}
