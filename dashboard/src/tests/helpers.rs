use async_trait::async_trait;
use crm_shared::Lead;
use mockall::mock;

use crate::error::DashboardResult;
use crate::source::{DataSource, Mutation};
use crate::view_model::ViewModel;

mock! {
    pub LeadBackend {}

    #[async_trait]
    impl DataSource<Lead> for LeadBackend {
        async fn fetch_all(&self) -> DashboardResult<Vec<Lead>>;
        async fn persist(&self, mutation: Mutation<Lead>) -> DashboardResult<()>;
    }
}

pub fn local_leads(records: Vec<Lead>, page_size: usize) -> ViewModel<Lead> {
    ViewModel::local(records, page_size).expect("fixture ids are unique")
}

/// Names on the current page, in display order
pub fn page_names(vm: &ViewModel<Lead>) -> Vec<String> {
    vm.items().into_iter().map(|lead| lead.name).collect()
}
