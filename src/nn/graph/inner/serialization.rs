/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : GraphInner 参数序列化（save_params/load_params）
 *
 * 文件格式：4字节魔数 + u32（小端）版本号 + bincode 编码的`Vec<(参数名, Tensor)>`（按节点 id 升序）
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::tensor::Tensor;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

impl GraphInner {
    /// 参数文件魔数
    const PARAMS_MAGIC: &'static [u8; 4] = b"PCPR";
    /// 参数文件版本
    const PARAMS_VERSION: u32 = 1;

    /// 保存所有可训练参数到二进制文件
    pub fn save_params<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let file = File::create(path.as_ref())
            .map_err(|e| GraphError::Io(format!("无法创建参数文件: {e}")))?;
        let mut writer = BufWriter::new(file);

        let mut params = Vec::new();
        for id in self.get_trainable_nodes() {
            let node = self.get_node(id)?;
            let value = node.value().ok_or_else(|| {
                GraphError::ComputationError(format!("参数{node}没有值"))
            })?;
            params.push((node.name().to_string(), value.clone()));
        }

        writer
            .write_all(Self::PARAMS_MAGIC)
            .map_err(|e| GraphError::Io(format!("写入魔数失败: {e}")))?;
        writer
            .write_all(&Self::PARAMS_VERSION.to_le_bytes())
            .map_err(|e| GraphError::Io(format!("写入版本失败: {e}")))?;
        bincode::serialize_into(&mut writer, &params)
            .map_err(|e| GraphError::Io(format!("写入参数失败: {e}")))?;
        writer
            .flush()
            .map_err(|e| GraphError::Io(format!("刷新缓冲区失败: {e}")))?;

        Ok(())
    }

    /// 从二进制文件加载参数：按名称匹配，形状必须一致，图中每个参数都须在文件中出现；
    /// 出错时图中的参数保持不变
    pub fn load_params<P: AsRef<Path>>(&mut self, path: P) -> Result<(), GraphError> {
        let file = File::open(path.as_ref())
            .map_err(|e| GraphError::Io(format!("无法打开参数文件: {e}")))?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|e| GraphError::Io(format!("读取魔数失败: {e}")))?;
        if &magic != Self::PARAMS_MAGIC {
            return Err(GraphError::InvalidFormat(
                "这不是 poly_critic 格式的参数文件，请确保使用 save_params() 保存的文件".to_string(),
            ));
        }

        let mut version_bytes = [0u8; 4];
        reader
            .read_exact(&mut version_bytes)
            .map_err(|e| GraphError::Io(format!("读取版本失败: {e}")))?;
        let version = u32::from_le_bytes(version_bytes);
        if version != Self::PARAMS_VERSION {
            return Err(GraphError::InvalidFormat(format!(
                "不支持的参数文件版本: {version}"
            )));
        }

        let params: Vec<(String, Tensor)> = bincode::deserialize_from(&mut reader)
            .map_err(|e| GraphError::InvalidFormat(format!("读取参数失败: {e}")))?;

        let name_to_id: HashMap<String, NodeId> = self
            .get_trainable_nodes()
            .into_iter()
            .filter_map(|id| self.get_node(id).ok().map(|n| (n.name().to_string(), id)))
            .collect();
        if name_to_id.is_empty() {
            eprintln!(
                "[poly_critic 警告] 图{}中没有任何参数节点，参数文件中的内容将被忽略",
                self.name
            );
            return Ok(());
        }

        // 名称与形状全部校验通过后才写入
        let mut assignments = Vec::with_capacity(params.len());
        for (name, tensor) in &params {
            let Some(&node_id) = name_to_id.get(name) else {
                eprintln!(
                    "[poly_critic 警告] 参数文件中的参数{}在图{}中不存在，已忽略",
                    name, self.name
                );
                continue;
            };
            let node = self.get_node(node_id)?;
            if let Some(current) = node.value() {
                if current.shape() != tensor.shape() {
                    return Err(GraphError::ShapeMismatch {
                        expected: current.shape().to_vec(),
                        got: tensor.shape().to_vec(),
                        message: format!("参数文件中参数{name}的形状与图中不一致"),
                    });
                }
            }
            assignments.push((node_id, tensor));
        }

        let mut missing = name_to_id
            .iter()
            .filter(|&(_, id)| !assignments.iter().any(|(assigned, _)| assigned == id))
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(GraphError::InvalidFormat(format!(
                "参数文件缺少图{}中的参数: {}",
                self.name,
                missing.join(", ")
            )));
        }

        for (node_id, tensor) in assignments {
            self.set_node_value(node_id, Some(tensor))?;
        }

        Ok(())
    }
}
