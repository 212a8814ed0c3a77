//! Build setting edits on the project descriptor (`project.pbxproj`).

use crate::bundler::{Error, Result};
use plist::{Dictionary, Value};
use std::path::{Path, PathBuf};

/// Build settings applied to the chosen configuration of every target.
pub const DEBUG_SYMBOL_SETTINGS: [(&str, &str); 2] = [
    ("DEBUG_INFORMATION_FORMAT", "dwarf-with-dsym"),
    ("ONLY_ACTIVE_ARCH", "NO"),
];

/// Path of the descriptor inside an `.xcodeproj` bundle.
pub fn descriptor_path(project_path: &Path) -> PathBuf {
    project_path.join("project.pbxproj")
}

/// Make every target emit separate `.dSYM` bundles for `configuration`.
///
/// Opens `<project_path>/project.pbxproj`, finds the configuration named
/// `configuration` in each target of the root project, sets
/// [`DEBUG_SYMBOL_SETTINGS`], and saves the descriptor as an XML property
/// list.
///
/// All lookups happen before the first mutation: if any target lacks the
/// configuration, [`Error::MissingConfiguration`] is returned and the file is
/// not written.
///
/// Returns the number of targets updated.
pub fn enable_debug_information(project_path: &Path, configuration: &str) -> Result<usize> {
    let path = descriptor_path(project_path);
    let mut root = Value::from_file(&path)?;

    let config_ids = {
        let root_dict = root
            .as_dictionary()
            .ok_or_else(|| malformed(&path, "top level is not a dictionary"))?;
        let objects = dictionary(root_dict, "objects", &path)?;
        find_configurations(root_dict, objects, configuration, &path)?
    };

    let objects = root
        .as_dictionary_mut()
        .and_then(|d| d.get_mut("objects"))
        .and_then(Value::as_dictionary_mut)
        .ok_or_else(|| malformed(&path, "missing objects"))?;

    for id in &config_ids {
        let config = objects
            .get_mut(id)
            .and_then(Value::as_dictionary_mut)
            .ok_or_else(|| malformed(&path, &format!("missing object {}", id)))?;
        if !config.contains_key("buildSettings") {
            config.insert("buildSettings".to_string(), Value::Dictionary(Dictionary::new()));
        }
        let settings = config
            .get_mut("buildSettings")
            .and_then(Value::as_dictionary_mut)
            .ok_or_else(|| malformed(&path, "buildSettings is not a dictionary"))?;
        for (key, value) in DEBUG_SYMBOL_SETTINGS {
            settings.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    root.to_file_xml(&path)?;
    log::debug!(
        "Enabled dSYM generation for {} target(s) in {}",
        config_ids.len(),
        path.display()
    );
    Ok(config_ids.len())
}

/// Resolve the object id of `configuration` for every target of the root project.
fn find_configurations(
    root: &Dictionary,
    objects: &Dictionary,
    configuration: &str,
    path: &Path,
) -> Result<Vec<String>> {
    let root_id = string(root, "rootObject", path)?;
    let project = object(objects, root_id, path)?;
    let targets = project
        .get("targets")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(path, "root project has no targets array"))?;

    let mut ids = Vec::with_capacity(targets.len());
    for target_id in targets {
        let target_id = target_id
            .as_string()
            .ok_or_else(|| malformed(path, "target reference is not a string"))?;
        let target = object(objects, target_id, path)?;
        let target_name = target
            .get("name")
            .and_then(Value::as_string)
            .unwrap_or(target_id);

        let list = object(objects, string(target, "buildConfigurationList", path)?, path)?;
        let configs = list
            .get("buildConfigurations")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed(path, "configuration list has no buildConfigurations"))?;

        let found = configs.iter().filter_map(Value::as_string).find(|id| {
            objects
                .get(*id)
                .and_then(Value::as_dictionary)
                .and_then(|c| c.get("name"))
                .and_then(Value::as_string)
                == Some(configuration)
        });

        match found {
            Some(id) => ids.push(id.to_string()),
            None => {
                return Err(Error::MissingConfiguration {
                    project: path.to_path_buf(),
                    target: target_name.to_string(),
                    configuration: configuration.to_string(),
                });
            }
        }
    }
    Ok(ids)
}

fn object<'a>(objects: &'a Dictionary, id: &str, path: &Path) -> Result<&'a Dictionary> {
    objects
        .get(id)
        .and_then(Value::as_dictionary)
        .ok_or_else(|| malformed(path, &format!("missing object {}", id)))
}

fn dictionary<'a>(dict: &'a Dictionary, key: &str, path: &Path) -> Result<&'a Dictionary> {
    dict.get(key)
        .and_then(Value::as_dictionary)
        .ok_or_else(|| malformed(path, &format!("missing {}", key)))
}

fn string<'a>(dict: &'a Dictionary, key: &str, path: &Path) -> Result<&'a str> {
    dict.get(key)
        .and_then(Value::as_string)
        .ok_or_else(|| malformed(path, &format!("missing {}", key)))
}

fn malformed(path: &Path, reason: &str) -> Error {
    Error::MalformedProject {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
