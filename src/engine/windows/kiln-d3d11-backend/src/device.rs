use windows::Win32::Graphics::Direct3D11::{
    ID3D11Device, ID3D11PixelShader, ID3D11VertexShader,
};

use crate::utils::{device_error_from_hresult, SendableIUnknown};
use kiln_gfx::backend::{Device, DeviceError, ShaderModule};

pub struct D3D11Device {
    device: SendableIUnknown<ID3D11Device>,
}

impl D3D11Device {
    pub(crate) fn new(device: ID3D11Device) -> Self {
        Self {
            device: device.into(),
        }
    }
}

// Module backend data. Each struct owns its stage's COM object for the
// module's lifetime; the single Release happens on drop.

struct D3D11VertexShaderModule {
    _shader: SendableIUnknown<ID3D11VertexShader>,
}

struct D3D11PixelShaderModule {
    _shader: SendableIUnknown<ID3D11PixelShader>,
}

impl Device for D3D11Device {
    fn create_vertex_shader(&self, bytecode: &[u8]) -> Result<ShaderModule, DeviceError> {
        let mut shader: Option<ID3D11VertexShader> = None;
        unsafe { self.device.CreateVertexShader(bytecode, None, Some(&mut shader)) }
            .map_err(device_error_from_hresult)?;

        match shader {
            Some(shader) => Ok(ShaderModule::new(Box::new(D3D11VertexShaderModule {
                _shader: shader.into(),
            }))),
            None => Err(DeviceError::Unknown),
        }
    }

    fn create_fragment_shader(&self, bytecode: &[u8]) -> Result<ShaderModule, DeviceError> {
        let mut shader: Option<ID3D11PixelShader> = None;
        unsafe { self.device.CreatePixelShader(bytecode, None, Some(&mut shader)) }
            .map_err(device_error_from_hresult)?;

        match shader {
            Some(shader) => Ok(ShaderModule::new(Box::new(D3D11PixelShaderModule {
                _shader: shader.into(),
            }))),
            None => Err(DeviceError::Unknown),
        }
    }
}
