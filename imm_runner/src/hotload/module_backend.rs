use std::os::raw::c_void;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Backend_Error(pub String);

impl From<libloading::Error> for Backend_Error {
    fn from(err: libloading::Error) -> Self {
        Backend_Error(err.to_string())
    }
}

/// The platform's dynamic loader, reduced to the three operations the hotloader needs.
pub trait Module_Backend {
    type Module;

    fn open(&mut self, path: &Path) -> Result<Self::Module, Backend_Error>;

    /// Returns the address of `name`, or None if the module does not export it.
    fn resolve(&self, module: &Self::Module, name: &str) -> Option<*const c_void>;

    fn close(&mut self, module: Self::Module) -> Result<(), Backend_Error>;
}

/// dlopen/LoadLibrary through libloading.
#[derive(Default)]
pub struct Native_Backend;

impl Module_Backend for Native_Backend {
    type Module = libloading::Library;

    fn open(&mut self, path: &Path) -> Result<Self::Module, Backend_Error> {
        // Running the module's initializers is the whole point of loading it.
        unsafe { libloading::Library::new(path) }.map_err(Backend_Error::from)
    }

    fn resolve(&self, module: &Self::Module, name: &str) -> Option<*const c_void> {
        unsafe {
            module
                .get::<*const c_void>(name.as_bytes())
                .ok()
                .map(|sym| *sym)
        }
    }

    fn close(&mut self, module: Self::Module) -> Result<(), Backend_Error> {
        module.close().map_err(Backend_Error::from)
    }
}
