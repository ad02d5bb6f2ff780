//! This module contains the macros used in the project.

/// Read a secret from the config file, or ask for it and save it.
///
/// Expands to an expression of type `String`, and uses `?` on the
/// enclosing function.
macro_rules! config_password {
    ($config:ident, $setting_name:ident, $struct_name:ident, $key_name:ident, $string:expr) => {
        match $config
            .config_data
            .$setting_name
            .as_ref()
            .and_then(|c| c.$key_name.clone())
        {
            Some(value) => value,
            None => {
                println!(concat!("Please enter ", $string, ":"));
                let value = $crate::utils::get_password()?;
                let cloned_value = value.clone();
                $config.update(|config_data| match config_data.$setting_name.as_mut() {
                    Some(local_config) => local_config.$key_name = Some(cloned_value),
                    None => {
                        config_data.$setting_name = Some($struct_name {
                            $key_name: Some(cloned_value),
                            ..Default::default()
                        });
                    }
                })?;
                value
            }
        }
    };
}

pub(crate) use config_password;
