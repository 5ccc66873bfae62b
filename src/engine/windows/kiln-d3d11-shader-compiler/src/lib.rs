#![cfg(windows)]

use std::ffi::CString;
use std::mem::ManuallyDrop;
use std::sync::Arc;
use windows::core::PCSTR;
use windows::Win32::Graphics::Direct3D::Fxc::D3DCompile;
use windows::Win32::Graphics::Direct3D::{ID3DBlob, ID3DInclude};

use kiln_gfx::ShaderStageFlagBits;
use kiln_shader_compiler::{ShaderCompiler, ShaderCompilerInput, ShaderCompilerOutput};

fn entry_point(stage: ShaderStageFlagBits) -> PCSTR {
    match stage {
        ShaderStageFlagBits::Vertex => windows::s!("kiln_vertex_main"),
        ShaderStageFlagBits::Fragment => windows::s!("kiln_fragment_main"),
    }
}

fn target_profile(stage: ShaderStageFlagBits) -> PCSTR {
    match stage {
        ShaderStageFlagBits::Vertex => windows::s!("vs_5_0"),
        ShaderStageFlagBits::Fragment => windows::s!("ps_5_0"),
    }
}

fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}

/// FXC-based shader compiler for the D3D11 backend.
pub struct D3D11ShaderCompiler;

impl D3D11ShaderCompiler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl ShaderCompiler for D3D11ShaderCompiler {
    fn compile_shader(
        &self,
        input: ShaderCompilerInput,
    ) -> Result<ShaderCompilerOutput, Vec<String>> {
        let source_name = CString::new(input.name).unwrap();

        // FXC's built-in include handler (D3D_COMPILE_STANDARD_FILE_INCLUDE).
        // The sentinel is the interface-pointer value 1, not a real object,
        // and must never be released.
        let standard_include: ManuallyDrop<ID3DInclude> =
            ManuallyDrop::new(unsafe { std::mem::transmute(1usize) });

        let mut bytecode_blob: Option<ID3DBlob> = None;
        let mut diagnostics_blob: Option<ID3DBlob> = None;

        let result = unsafe {
            D3DCompile(
                input.source.as_ptr() as *const _,
                input.source.len(),
                PCSTR(source_name.as_ptr() as *const u8),
                None,
                &*standard_include,
                entry_point(input.stage),
                target_profile(input.stage),
                0,
                0,
                &mut bytecode_blob,
                Some(&mut diagnostics_blob),
            )
        };

        // Both blobs are copied into owned buffers and released here; the
        // diagnostics blob may be populated on success as well (warnings).
        let diagnostics = diagnostics_blob
            .map(|blob| String::from_utf8_lossy(blob_bytes(&blob)).into_owned())
            .unwrap_or_default();

        match result {
            Ok(()) => {
                let bytecode = bytecode_blob
                    .map(|blob| blob_bytes(&blob).to_vec())
                    .unwrap_or_default();
                Ok(ShaderCompilerOutput::new(bytecode, diagnostics))
            }
            Err(error) => Err(vec![if diagnostics.is_empty() {
                error.to_string()
            } else {
                diagnostics
            }]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_mappings_are_total() {
        for stage in [ShaderStageFlagBits::Vertex, ShaderStageFlagBits::Fragment] {
            assert!(!entry_point(stage).0.is_null());
            assert!(!target_profile(stage).0.is_null());
        }
    }
}
