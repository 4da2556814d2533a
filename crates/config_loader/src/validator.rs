//! 配置校验模块
//!
//! 校验规则：
//! - 数值范围 (tick_ms / mode_duration_ticks / 电量阈值) 由 `validator` 派生检查
//! - battery_reset.threshold < battery_reset.target
//! - exposure.bind 为合法 socket 地址
//! - sink 名称非空且唯一，file sink 必须给出 path
//! - file 模式至少配置一个 sink

use std::collections::HashSet;
use std::net::SocketAddr;

use contracts::{AdapterKind, ContractError, SimulatorBlueprint, SinkType};
use validator::Validate;

/// 校验 SimulatorBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &SimulatorBlueprint) -> Result<(), ContractError> {
    validate_ranges(blueprint)?;
    validate_battery_reset(blueprint)?;
    validate_bind(blueprint)?;
    validate_sinks(blueprint)?;
    Ok(())
}

/// 派生的范围校验
fn validate_ranges(blueprint: &SimulatorBlueprint) -> Result<(), ContractError> {
    blueprint
        .validate()
        .map_err(|e| ContractError::config_validation("blueprint", e.to_string()))
}

/// 校验电池重置阈值与目标
fn validate_battery_reset(blueprint: &SimulatorBlueprint) -> Result<(), ContractError> {
    let Some(reset) = blueprint.generator.battery_reset else {
        return Ok(());
    };

    // NaN 能通过 range 派生检查, 这里显式拒绝
    if !reset.threshold.is_finite() || !reset.target.is_finite() {
        return Err(ContractError::config_validation(
            "generator.battery_reset",
            format!(
                "threshold ({}) and target ({}) must be finite",
                reset.threshold, reset.target
            ),
        ));
    }

    if reset.threshold >= reset.target {
        return Err(ContractError::config_validation(
            "generator.battery_reset",
            format!(
                "threshold ({}) must be < target ({})",
                reset.threshold, reset.target
            ),
        ));
    }
    Ok(())
}

/// 校验 HTTP 监听地址
fn validate_bind(blueprint: &SimulatorBlueprint) -> Result<(), ContractError> {
    let bind = &blueprint.exposure.bind;
    bind.parse::<SocketAddr>().map_err(|e| {
        ContractError::config_validation(
            "exposure.bind",
            format!("invalid socket address '{bind}': {e}"),
        )
    })?;
    Ok(())
}

/// 校验 sink 配置
fn validate_sinks(blueprint: &SimulatorBlueprint) -> Result<(), ContractError> {
    let sinks = &blueprint.exposure.sinks;

    if blueprint.exposure.adapter == AdapterKind::File && sinks.is_empty() {
        return Err(ContractError::config_validation(
            "exposure.sinks",
            "file adapter requires at least one sink",
        ));
    }

    let mut seen = HashSet::new();
    for (idx, sink) in sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("exposure.sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("exposure.sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
        if sink.sink_type == SinkType::File {
            let has_path = sink.params.get("path").is_some_and(|p| !p.trim().is_empty());
            if !has_path {
                return Err(ContractError::config_validation(
                    format!("exposure.sinks[{}].params.path", sink.name),
                    "file sink requires a non-empty 'path' parameter",
                ));
            }
        }
    }
    Ok(())
}
