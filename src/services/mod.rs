//! 业务逻辑服务模块
//!
//! 数据加载、过滤、排序、展示规则以及页面渲染

pub mod dashboard; // 看板状态
pub mod dataset;   // 数据集加载
pub mod debounce;  // 输入防抖
pub mod display;   // 分组颜色、市盈率和策略规则
pub mod filter;    // 全文过滤
pub mod numeric;   // 数值解析
pub mod render;    // 页面渲染
pub mod session;   // 共享看板
pub mod sort;      // 排序
