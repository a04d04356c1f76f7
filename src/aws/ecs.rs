//! ECS workflows: service -> private DNS resolution, and service listing.

use serde::Serialize;
use serde_json::Value;

use super::command::{CLUSTER_PAGES, SERVICE_PAGES, string_list};
use super::{AwsCli, AwsCommand, match_arn, name_from_arn, paginate};
use crate::error::{OpsError, OpsResult};
use crate::exec::{Runner, run_json};

const TASK_ARNS: &str = "taskArns";
const CONTAINER_INSTANCE_ARN: &str = "/tasks/0/containerInstanceArn";
const EC2_INSTANCE_ID: &str = "/containerInstances/0/ec2InstanceId";
const PRIVATE_DNS_NAME: &str = "/Reservations/0/Instances/0/PrivateDnsName";

fn str_at<'a>(value: &'a Value, pointer: &str) -> OpsResult<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| OpsError::MissingField(pointer.to_string()))
}

pub fn list_clusters(runner: &dyn Runner, aws: &AwsCli) -> OpsResult<Vec<String>> {
    let values = paginate(runner, aws, &AwsCommand::ListClusters, &CLUSTER_PAGES)?;
    string_list(values, CLUSTER_PAGES.results)
}

pub fn list_cluster_services(
    runner: &dyn Runner,
    aws: &AwsCli,
    cluster_arn: &str,
) -> OpsResult<Vec<String>> {
    let cmd = AwsCommand::ListServices {
        cluster: cluster_arn.to_string(),
    };
    let values = paginate(runner, aws, &cmd, &SERVICE_PAGES)?;
    string_list(values, SERVICE_PAGES.results)
}

/// Resolve `cluster`/`service` (short names) to the private DNS name of the EC2
/// instance hosting one of the service's running tasks.
///
/// Six sequential AWS calls; any failure aborts. When several tasks are running
/// the first one in the order `list-tasks` returned is used.
pub fn resolve_private_dns(
    runner: &dyn Runner,
    aws: &AwsCli,
    cluster: &str,
    service: &str,
) -> OpsResult<String> {
    let clusters = list_clusters(runner, aws)?;
    let cluster_arn = match_arn(cluster, &clusters)?;
    crate::log_info!("cluster: {cluster_arn}");

    let services = list_cluster_services(runner, aws, cluster_arn)?;
    let service_arn = match_arn(service, &services)?;
    crate::log_info!("service: {service_arn}");

    let tasks = run_json(
        runner,
        &aws.invocation(
            &AwsCommand::ListTasks {
                cluster: cluster_arn.to_string(),
                service: service_arn.to_string(),
            },
            &[],
        ),
    )?;
    let task_arn = tasks
        .get(TASK_ARNS)
        .and_then(Value::as_array)
        .ok_or_else(|| OpsError::MissingField(TASK_ARNS.to_string()))?
        .iter()
        .find_map(Value::as_str)
        .ok_or_else(|| {
            OpsError::NoResourceFound(format!("No running tasks found for service {service_arn}"))
        })?
        .to_string();
    crate::log_info!("task: {task_arn}");

    let task = run_json(
        runner,
        &aws.invocation(
            &AwsCommand::DescribeTasks {
                cluster: cluster_arn.to_string(),
                task: task_arn,
            },
            &[],
        ),
    )?;
    let container_instance = str_at(&task, CONTAINER_INSTANCE_ARN)?;
    crate::log_info!("container instance: {container_instance}");

    let container = run_json(
        runner,
        &aws.invocation(
            &AwsCommand::DescribeContainerInstances {
                cluster: cluster_arn.to_string(),
                container_instance: container_instance.to_string(),
            },
            &[],
        ),
    )?;
    let instance_id = str_at(&container, EC2_INSTANCE_ID)?;
    crate::log_info!("ec2 instance: {instance_id}");

    let instances = run_json(
        runner,
        &aws.invocation(
            &AwsCommand::DescribeInstances {
                instance_id: instance_id.to_string(),
            },
            &[],
        ),
    )?;
    Ok(str_at(&instances, PRIVATE_DNS_NAME)?.to_string())
}

/// A cluster/service pair as printed by `ecs-services`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceEntry {
    pub cluster: String,
    pub service: String,
}

impl ServiceEntry {
    /// Short form: last path segment of each ARN.
    pub fn short(&self) -> ServiceEntry {
        ServiceEntry {
            cluster: name_from_arn(&self.cluster).to_string(),
            service: name_from_arn(&self.service).to_string(),
        }
    }
}

/// Every service of every cluster, clusters in listing order.
pub fn list_services(runner: &dyn Runner, aws: &AwsCli) -> OpsResult<Vec<ServiceEntry>> {
    let mut entries = Vec::new();
    for cluster_arn in list_clusters(runner, aws)? {
        for service_arn in list_cluster_services(runner, aws, &cluster_arn)? {
            entries.push(ServiceEntry {
                cluster: cluster_arn.clone(),
                service: service_arn,
            });
        }
    }
    Ok(entries)
}
