use crate::{
    environment::EnvStore,
    launcher::{LaunchError, Launcher},
};
use anyhow::Context;
use std::{
    ffi::{OsStr, c_void},
    os::windows::ffi::OsStrExt,
};
use windows::{
    Win32::{
        Foundation::{
            ERROR_CANCELLED, ERROR_FILE_NOT_FOUND, LPARAM, WAIT_FAILED, WIN32_ERROR, WPARAM,
        },
        System::{
            Registry::{
                HKEY_CURRENT_USER, REG_EXPAND_SZ, REG_SZ, REG_VALUE_TYPE, RRF_NOEXPAND,
                RRF_RT_REG_EXPAND_SZ, RRF_RT_REG_SZ, RegDeleteKeyValueW, RegGetValueW,
                RegSetKeyValueW,
            },
            Threading::{GetExitCodeProcess, INFINITE, WaitForSingleObject},
        },
        UI::{
            Shell::{SEE_MASK_NOASYNC, SEE_MASK_NOCLOSEPROCESS, SHELLEXECUTEINFOW, ShellExecuteExW},
            WindowsAndMessaging::{
                HWND_BROADCAST, SMTO_ABORTIFHUNG, SW_SHOWNORMAL, SendMessageTimeoutW,
                WM_SETTINGCHANGE,
            },
        },
    },
    core::{Free, PCWSTR, w},
};

/// Closes the wrapped handle on drop.
pub struct WindowsGuard<T: Free>(pub T);

impl<T: Free> Drop for WindowsGuard<T> {
    fn drop(&mut self) {
        unsafe { self.0.free() };
    }
}

/// Nul-terminated UTF-16 copy of `value`.
fn wide(value: impl AsRef<OsStr>) -> Result<Vec<u16>, LaunchError> {
    let value = value.as_ref().encode_wide().collect::<Vec<_>>();
    if value.contains(&0) {
        return Err(LaunchError::InteriorNul);
    }
    Ok(value.into_iter().chain(Some(0)).collect())
}

fn launch_error(err: &windows::core::Error) -> LaunchError {
    if err.code() == ERROR_CANCELLED.to_hresult() {
        LaunchError::Cancelled
    } else {
        LaunchError::Os {
            code: err.code().0,
            message: err.message(),
        }
    }
}

/// Launches through the shell with the `runas` verb, which raises the UAC
/// prompt.
#[derive(Debug, Default)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn launch_elevated(
        &mut self,
        program: &str,
        args: &str,
        wait: bool,
    ) -> Result<Option<u32>, LaunchError> {
        let file = wide(program)?;
        let parameters = wide(args)?;
        let cb_size =
            u32::try_from(size_of::<SHELLEXECUTEINFOW>()).map_err(|_| LaunchError::Os {
                code: 0,
                message: "SHELLEXECUTEINFOW exceeds u32::MAX".to_owned(),
            })?;

        let mut info = SHELLEXECUTEINFOW {
            cbSize: cb_size,
            fMask: SEE_MASK_NOCLOSEPROCESS | SEE_MASK_NOASYNC,
            lpVerb: w!("runas"),
            lpFile: PCWSTR(file.as_ptr()),
            lpParameters: PCWSTR(parameters.as_ptr()),
            nShow: SW_SHOWNORMAL.0,
            ..Default::default()
        };

        unsafe { ShellExecuteExW(&raw mut info) }.map_err(|err| launch_error(&err))?;

        // No handle when the shell handed the request to an existing process.
        if info.hProcess.is_invalid() {
            return Ok(None);
        }
        let process = WindowsGuard(info.hProcess);
        if !wait {
            return Ok(None);
        }

        if unsafe { WaitForSingleObject(process.0, INFINITE) } == WAIT_FAILED {
            return Err(launch_error(&windows::core::Error::from_win32()));
        }

        let mut code = 0u32;
        unsafe { GetExitCodeProcess(process.0, &raw mut code) }
            .map_err(|err| launch_error(&err))?;
        Ok(Some(code))
    }
}

/// Process variables from the process block, user variables from
/// `HKEY_CURRENT_USER\Environment`.
#[derive(Debug, Default)]
pub struct RegistryEnv;

const ENVIRONMENT_KEY: PCWSTR = w!("Environment");

impl RegistryEnv {
    /// Tells running applications (Explorer in particular) to reload the
    /// user environment.
    fn broadcast_change() {
        let mut result = 0usize;
        unsafe {
            SendMessageTimeoutW(
                HWND_BROADCAST,
                WM_SETTINGCHANGE,
                WPARAM(0),
                LPARAM(ENVIRONMENT_KEY.as_ptr() as isize),
                SMTO_ABORTIFHUNG,
                5000,
                Some(&raw mut result),
            )
        };
    }
}

impl EnvStore for RegistryEnv {
    fn process_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }

    fn user_var(&self, name: &str) -> anyhow::Result<Option<String>> {
        let value_name = wide(name)?;
        let flags = RRF_RT_REG_SZ | RRF_RT_REG_EXPAND_SZ | RRF_NOEXPAND;

        let mut size = 0u32;
        let status = unsafe {
            RegGetValueW(
                HKEY_CURRENT_USER,
                ENVIRONMENT_KEY,
                PCWSTR(value_name.as_ptr()),
                flags,
                None,
                None,
                Some(&raw mut size),
            )
        };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(None);
        }
        status.ok().with_context(|| format!("query size of {name}"))?;

        let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
        let mut kind = REG_VALUE_TYPE::default();
        unsafe {
            RegGetValueW(
                HKEY_CURRENT_USER,
                ENVIRONMENT_KEY,
                PCWSTR(value_name.as_ptr()),
                flags,
                Some(&raw mut kind),
                Some(buffer.as_mut_ptr().cast::<c_void>()),
                Some(&raw mut size),
            )
        }
        .ok()
        .with_context(|| format!("read {name}"))?;

        buffer.truncate(size as usize / 2);
        while buffer.last() == Some(&0) {
            buffer.pop();
        }
        let value = String::from_utf16(&buffer).with_context(|| format!("decode {name}"))?;
        Ok(Some(value))
    }

    fn set_user_var(&mut self, name: &str, value: Option<&str>) -> anyhow::Result<()> {
        let value_name = wide(name)?;

        let status = match value {
            Some(value) => {
                let data = wide(value)?;
                let kind = if value.contains('%') { REG_EXPAND_SZ } else { REG_SZ };
                let bytes = u32::try_from(data.len() * size_of::<u16>())
                    .with_context(|| format!("{name} is too long"))?;
                unsafe {
                    RegSetKeyValueW(
                        HKEY_CURRENT_USER,
                        ENVIRONMENT_KEY,
                        PCWSTR(value_name.as_ptr()),
                        kind.0,
                        Some(data.as_ptr().cast::<c_void>()),
                        bytes,
                    )
                }
            }
            None => unsafe {
                RegDeleteKeyValueW(
                    HKEY_CURRENT_USER,
                    ENVIRONMENT_KEY,
                    PCWSTR(value_name.as_ptr()),
                )
            },
        };

        match status {
            WIN32_ERROR(0) => {}
            err if value.is_none() && err == ERROR_FILE_NOT_FOUND => return Ok(()),
            err => err.ok().with_context(|| format!("write {name}"))?,
        }

        Self::broadcast_change();
        Ok(())
    }
}
