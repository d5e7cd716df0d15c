/*
 * Open/save dialog requests for the model import and export commands. The
 * filters and titles live here so they are shared by every `FileDialogs`
 * implementation; the Win32 one is in `dialog_windows`.
 */
use crate::types::ModelFileKind;

/// One "description|pattern" entry of a dialog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub description: &'static str,
    pub pattern: &'static str,
}

const ALL_FILES: FileFilter = FileFilter {
    description: "All files (*.*)",
    pattern: "*.*",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDialogRequest {
    pub title: &'static str,
    pub filters: Vec<FileFilter>,
    /// Put the process working directory back after the dialog closes.
    pub restore_directory: bool,
}

/// Shows file dialogs. Returns `None` when the user cancels.
pub trait FileDialogs {
    fn open_file(&mut self, request: &FileDialogRequest) -> Option<String>;
    fn save_file(&mut self, request: &FileDialogRequest) -> Option<String>;
}

/// Import is only offered for Metro and OBJ models.
pub fn import_request(kind: ModelFileKind) -> Option<FileDialogRequest> {
    let (title, mut filters) = match kind {
        ModelFileKind::MetroModel => (
            "Choose Metro model/mesh file...",
            vec![
                FileFilter {
                    description: "Metro model files (*.model)",
                    pattern: "*.model",
                },
                FileFilter {
                    description: "Metro mesh files (*.mesh)",
                    pattern: "*.mesh",
                },
            ],
        ),
        ModelFileKind::Obj => (
            "Choose OBJ model file...",
            vec![FileFilter {
                description: "OBJ model files (*.obj)",
                pattern: "*.obj",
            }],
        ),
        ModelFileKind::Fbx => return None,
    };
    filters.push(ALL_FILES);
    Some(FileDialogRequest {
        title,
        filters,
        restore_directory: true,
    })
}

pub fn export_request(kind: ModelFileKind) -> FileDialogRequest {
    let (title, filter) = match kind {
        ModelFileKind::MetroModel => (
            "Where to export Metro model...",
            FileFilter {
                description: "Metro Model file (*.model)",
                pattern: "*.model",
            },
        ),
        ModelFileKind::Obj => (
            "Where to export OBJ model...",
            FileFilter {
                description: "OBJ model file (*.obj)",
                pattern: "*.obj",
            },
        ),
        ModelFileKind::Fbx => (
            "Where to export FBX model...",
            FileFilter {
                description: "FBX model file (*.fbx)",
                pattern: "*.fbx",
            },
        ),
    };
    FileDialogRequest {
        title,
        filters: vec![filter, ALL_FILES],
        restore_directory: true,
    }
}

/// Win32 filter format: `desc\0pattern\0...\0\0`, UTF-16.
pub fn encode_filter(filters: &[FileFilter]) -> Vec<u16> {
    let mut encoded = Vec::new();
    for filter in filters {
        encoded.extend(filter.description.encode_utf16());
        encoded.push(0);
        encoded.extend(filter.pattern.encode_utf16());
        encoded.push(0);
    }
    encoded.push(0);
    encoded
}
