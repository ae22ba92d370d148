//! Account, project and profile lookups.

use super::{Network, PathArgs, PROFILE, PROFILES, PROJECT, PROJECTS};
use crate::client::QuantumClient;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::params::Params;

impl QuantumClient {
    /// All projects available to the account.
    pub async fn projects(&self) -> Result<Envelope> {
        self.call(&PROJECTS, &PathArgs::new(), Params::new()).await
    }

    /// A project's properties, including its brands.
    pub async fn project(&self, project_id: impl ToString) -> Result<Envelope> {
        self.call(&PROJECT, &PathArgs::new().project(project_id), Params::new())
            .await
    }

    /// Profiles (fan pages, accounts, channels) tracked by a project on one
    /// network.
    pub async fn profiles(&self, network: Network, project_id: impl ToString) -> Result<Envelope> {
        let args = PathArgs::new().network(network).project(project_id);
        self.call(&PROFILES, &args, Params::new()).await
    }

    /// A single profile of a project.
    pub async fn profile(
        &self,
        network: Network,
        project_id: impl ToString,
        profile_id: impl ToString,
    ) -> Result<Envelope> {
        let args = PathArgs::new()
            .network(network)
            .project(project_id)
            .profile(profile_id);
        self.call(&PROFILE, &args, Params::new()).await
    }
}
