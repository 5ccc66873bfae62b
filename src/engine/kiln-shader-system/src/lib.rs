use std::fmt;

use kiln_core::{kiln_info, kiln_warn};
use kiln_gfx::backend::{Device, DeviceError, ShaderModule};
use kiln_gfx::ShaderStageFlagBits;
use kiln_shader_compiler::{ShaderCompiler, ShaderCompilerInput};

/// Origin and payload of one shader stage. The two forms are mutually
/// exclusive by construction; which one a description carries decides
/// whether module creation goes through the shader compiler at all.
pub enum ShaderStageSource {
    /// HLSL source code, compiled at module-creation time.
    Hlsl(String),
    /// Already-compiled bytecode, handed to the device as-is.
    Bytecode(Vec<u8>),
}

/// Describes a single stage of a shader program.
pub struct ShaderStageDescription {
    stage: ShaderStageFlagBits,
    source: ShaderStageSource,
}

impl ShaderStageDescription {
    /// A stage compiled from HLSL source. Empty source is rejected here,
    /// before any compiler or device call can see it.
    pub fn from_hlsl(
        stage: ShaderStageFlagBits,
        source: impl Into<String>,
    ) -> Result<Self, ShaderError> {
        let source = source.into();
        if source.is_empty() {
            return Err(ShaderError::InvalidDescription(format!(
                "{:?} stage has no source code",
                stage
            )));
        }

        Ok(Self {
            stage,
            source: ShaderStageSource::Hlsl(source),
        })
    }

    /// A stage created from pre-compiled bytecode. Empty bytecode is
    /// rejected here, before any device call can see it.
    pub fn from_bytecode(
        stage: ShaderStageFlagBits,
        bytecode: Vec<u8>,
    ) -> Result<Self, ShaderError> {
        if bytecode.is_empty() {
            return Err(ShaderError::InvalidDescription(format!(
                "{:?} stage has no bytecode",
                stage
            )));
        }

        Ok(Self {
            stage,
            source: ShaderStageSource::Bytecode(bytecode),
        })
    }

    pub fn stage(&self) -> ShaderStageFlagBits {
        self.stage
    }

    pub fn source(&self) -> &ShaderStageSource {
        &self.source
    }
}

/// Ordered description of a complete shader program.
///
/// Listing the same stage twice is tolerated; only the first occurrence is
/// honored (see [`ShaderProgram::new`]).
pub struct ShaderDescription {
    /// Debug name carried into compiler diagnostics and logs.
    pub name: String,
    pub stages: Vec<ShaderStageDescription>,
}

impl ShaderDescription {
    pub fn new(name: impl Into<String>, stages: Vec<ShaderStageDescription>) -> Self {
        Self {
            name: name.into(),
            stages,
        }
    }
}

#[derive(Debug)]
pub enum ShaderError {
    /// The description violates a payload invariant. Raised before any
    /// compiler or device interaction.
    InvalidDescription(String),
    /// The native compiler rejected a stage's source code.
    Compilation {
        stage: ShaderStageFlagBits,
        errors: Vec<String>,
    },
    /// The device failed to materialize a module from valid bytecode.
    ModuleCreation {
        stage: ShaderStageFlagBits,
        error: DeviceError,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::InvalidDescription(message) => {
                write!(f, "Invalid shader description: {}", message)
            }
            ShaderError::Compilation { stage, errors } => {
                write!(
                    f,
                    "Failed to compile {:?} stage: {}",
                    stage,
                    errors.join("\n")
                )
            }
            ShaderError::ModuleCreation { stage, error } => {
                write!(f, "Failed to create {:?} stage module: {:?}", stage, error)
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// Create the backend module for a single stage description.
///
/// HLSL sources go through `compiler` first; the compiled bytecode lives
/// only until the device call returns. Bytecode sources reach the device
/// untouched. Compiler warnings are logged and do not fail the creation; a
/// failed result code does.
pub fn create_stage_module(
    device: &dyn Device,
    compiler: &dyn ShaderCompiler,
    name: &str,
    description: &ShaderStageDescription,
) -> Result<ShaderModule, ShaderError> {
    let stage = description.stage;

    let compiled_bytecode;
    let bytecode: &[u8] = match &description.source {
        ShaderStageSource::Bytecode(bytecode) => bytecode,
        ShaderStageSource::Hlsl(source) => {
            let output = compiler
                .compile_shader(ShaderCompilerInput {
                    name,
                    stage,
                    source,
                })
                .map_err(|errors| ShaderError::Compilation { stage, errors })?;

            if !output.warnings.is_empty() {
                kiln_warn!(
                    "Shader \"{}\" {:?} stage compiled with warnings: {}",
                    name,
                    stage,
                    output.warnings
                );
            }

            compiled_bytecode = output.bytecode;
            &compiled_bytecode
        }
    };

    match stage {
        ShaderStageFlagBits::Vertex => device.create_vertex_shader(bytecode),
        ShaderStageFlagBits::Fragment => device.create_fragment_shader(bytecode),
    }
    .map_err(|error| ShaderError::ModuleCreation { stage, error })
}

/// The compiled modules of one shader program, exactly one per stage.
///
/// A program exclusively owns its modules from construction to drop; the
/// native objects behind them are released when the program is dropped, in
/// no particular order. There is no mutation after construction.
pub struct ShaderProgram {
    modules: Vec<(ShaderStageFlagBits, ShaderModule)>,
}

impl ShaderProgram {
    /// Materialize every stage of `description`, in order.
    ///
    /// A stage that already has a module is skipped first-wins; the skip is
    /// logged since a duplicate almost always indicates a caller bug. The
    /// first stage that fails to compile or materialize aborts construction
    /// with its error, and the modules built so far are released on the way
    /// out. A partially built program is never observable.
    pub fn new(
        device: &dyn Device,
        compiler: &dyn ShaderCompiler,
        description: &ShaderDescription,
    ) -> Result<Self, ShaderError> {
        // Upper bound; duplicate stages are dropped below.
        let mut modules: Vec<(ShaderStageFlagBits, ShaderModule)> =
            Vec::with_capacity(description.stages.len());

        for stage_description in &description.stages {
            let stage = stage_description.stage;

            if modules.iter().any(|(existing, _)| *existing == stage) {
                kiln_warn!(
                    "Shader \"{}\" describes its {:?} stage more than once, ignoring the duplicate",
                    description.name,
                    stage
                );
                continue;
            }

            let module = create_stage_module(device, compiler, &description.name, stage_description)?;
            modules.push((stage, module));
        }

        kiln_info!(
            "Created shader \"{}\" ({} stages)",
            description.name,
            modules.len()
        );
        Ok(Self { modules })
    }

    /// The module created for `stage`, or `None` if the program was never
    /// described with that stage.
    pub fn stage_module(&self, stage: ShaderStageFlagBits) -> Option<&ShaderModule> {
        self.modules
            .iter()
            .find(|(existing, _)| *existing == stage)
            .map(|(_, module)| module)
    }

    pub fn stage_count(&self) -> usize {
        self.modules.len()
    }
}
