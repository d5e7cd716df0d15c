/*
 * Common-dialog implementation of `FileDialogs` (GetOpenFileNameW /
 * GetSaveFileNameW). Cancellation and dialog errors both come back as `None`;
 * errors are logged with their extended error code.
 */
use crate::file_dialogs::{FileDialogRequest, FileDialogs, encode_filter};
use crate::types::NativeWindowId;
use crate::window_common::hwnd_from_id;

use windows::Win32::{
    Foundation::HWND,
    UI::Controls::Dialogs::{
        CommDlgExtendedError, GetOpenFileNameW, GetSaveFileNameW, OFN_FILEMUSTEXIST,
        OFN_NOCHANGEDIR, OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST, OPEN_FILENAME_FLAGS,
        OPENFILENAMEW,
    },
};
use windows::core::{HSTRING, PCWSTR, PWSTR};

const MAX_PATH_CHARS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKind {
    Open,
    Save,
}

/// Modal dialogs owned by `owner` (or unowned).
#[derive(Debug, Default)]
pub struct Win32FileDialogs {
    owner: Option<NativeWindowId>,
}

impl Win32FileDialogs {
    pub fn new(owner: Option<NativeWindowId>) -> Self {
        Self { owner }
    }

    pub fn set_owner(&mut self, owner: Option<NativeWindowId>) {
        self.owner = owner;
    }

    fn flags(kind: DialogKind, request: &FileDialogRequest) -> OPEN_FILENAME_FLAGS {
        let mut flags = OFN_PATHMUSTEXIST;
        flags |= match kind {
            DialogKind::Open => OFN_FILEMUSTEXIST,
            DialogKind::Save => OFN_OVERWRITEPROMPT,
        };
        if request.restore_directory {
            flags |= OFN_NOCHANGEDIR;
        }
        flags
    }

    fn show(&self, kind: DialogKind, request: &FileDialogRequest) -> Option<String> {
        let filter = encode_filter(&request.filters);
        let title = HSTRING::from(request.title);
        let mut file_buffer = vec![0u16; MAX_PATH_CHARS];

        let mut ofn = OPENFILENAMEW {
            lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
            hwndOwner: self.owner.map(hwnd_from_id).unwrap_or(HWND::default()),
            lpstrFilter: PCWSTR(filter.as_ptr()),
            nFilterIndex: 1,
            lpstrFile: PWSTR(file_buffer.as_mut_ptr()),
            nMaxFile: file_buffer.len() as u32,
            lpstrTitle: PCWSTR(title.as_ptr()),
            Flags: Self::flags(kind, request),
            ..Default::default()
        };

        let accepted = unsafe {
            match kind {
                DialogKind::Open => GetOpenFileNameW(&mut ofn),
                DialogKind::Save => GetSaveFileNameW(&mut ofn),
            }
        };

        if !accepted.as_bool() {
            let code = unsafe { CommDlgExtendedError() };
            if code.0 != 0 {
                log::error!("FileDialogs: '{}' failed with extended error {code:?}", request.title);
            } else {
                log::debug!("FileDialogs: '{}' cancelled", request.title);
            }
            return None;
        }

        let len = file_buffer
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(file_buffer.len());
        let path = String::from_utf16_lossy(&file_buffer[..len]);
        log::debug!("FileDialogs: '{}' chose {path}", request.title);
        Some(path)
    }
}

impl FileDialogs for Win32FileDialogs {
    fn open_file(&mut self, request: &FileDialogRequest) -> Option<String> {
        self.show(DialogKind::Open, request)
    }

    fn save_file(&mut self, request: &FileDialogRequest) -> Option<String> {
        self.show(DialogKind::Save, request)
    }
}
