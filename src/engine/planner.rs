//! Plan builder - the three managed resources and how they relate

use declarative::Plan;

use crate::backend::Host;
use crate::params::Settings;
use crate::resource::{ConfigFile, Package, Service};

/// Build the plan for `settings` acting through `host`.
///
/// Package before Config, Config notifies Service. Pure construction: no
/// host state is read and nothing is validated until the plan is ordered.
pub fn build(settings: &Settings, host: &Host) -> Plan {
    let mut plan = Plan::new();

    let package = plan.add(Box::new(Package::new(
        &settings.package_name,
        host.packages.clone(),
    )));
    let config = plan.add(Box::new(
        ConfigFile::new(&settings.config_path, settings.config_content.as_str())
            .with_mode(settings.config_mode),
    ));
    let service = plan.add(Box::new(Service::new(
        &settings.service_name,
        host.services.clone(),
    )));

    plan.before(&package, &config);
    plan.notify(&config, &service);
    plan
}
