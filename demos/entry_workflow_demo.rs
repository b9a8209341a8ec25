//! 病历条目工作流演示程序
//!
//! 在本地启动 REST API，然后以客户端身份：
//! - 加载患者列表并定位当前患者
//! - 挂载详情页并加载诊断列表
//! - 提交一条评级无效的条目（被本地校验拦截）
//! - 提交一条有效的健康检查条目并渲染结果

use anyhow::Result;
use patientor_web::{PatientStore, WebConfig, WebServer};
use patientor_workflow::{
    find_patient, ApiClientConfig, HttpApiClient, PatientPage, PatientorApi, SubmitOutcome,
    TracingNotifier,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

const PATIENT_ID: &str = "d2773822-f723-11e9-8f0b-362b9e155667";

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    info!("🚀 启动病历条目工作流演示");

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = WebServer::new(WebConfig::default(), Arc::new(PatientStore::seeded()?))?;
    let server_task = tokio::spawn(server.run_on(listener));

    let client = Arc::new(HttpApiClient::new(ApiClientConfig {
        base_url: format!("http://{}/api", addr),
    }));

    demo_workflow(client).await?;

    server_task.abort();
    info!("✅ 工作流演示完成");
    Ok(())
}

async fn demo_workflow(client: Arc<HttpApiClient>) -> Result<()> {
    info!("\n📋 加载患者列表");
    let patients = client.list_patients().await?;
    info!("   患者数量: {}", patients.len());

    let Some(patient) = find_patient(&patients, PATIENT_ID).cloned() else {
        warn!("❌ 未找到患者 {}", PATIENT_ID);
        return Ok(());
    };

    let mut page = PatientPage::new(client, patient, Arc::new(TracingNotifier));
    page.mount();
    page.wait_loaded().await;
    info!("   已加载诊断代码: {}", page.diagnoses().await.len());
    println!("{}\n", page.render().await);

    if let Err(e) = page.open_hospital_form() {
        warn!("   {}", e);
    }

    info!("\n📝 提交无效评级");
    page.open_health_check_form()?;
    {
        let form = page.form_mut();
        form.set_date("2024-01-01");
        form.set_description("checkup");
        form.set_specialist("Dr. X");
        form.set_diagnosis_codes_text("J10.1, Z99");
        form.set_health_check_rating_text("7");
    }
    let outcome = page.submit_health_check().await?;
    info!("   结果: {:?}, 当前状态: {:?}", outcome, page.state());

    info!("\n📝 提交有效评级");
    page.form_mut().set_health_check_rating_text("1");
    match page.submit_health_check().await? {
        SubmitOutcome::Appended(entry) => info!("✅ 新条目: {:?}", entry.id()),
        other => warn!("❌ 提交未成功: {:?}", other),
    }
    info!("   当前状态: {:?}", page.state());

    println!("{}", page.render().await);
    page.unmount();
    Ok(())
}
